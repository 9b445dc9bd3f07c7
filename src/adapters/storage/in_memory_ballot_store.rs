//! In-Memory Ballot Store Adapter
//!
//! Keeps agendas in a map behind a single tokio `RwLock`. Every write takes
//! the lock once and checks its precondition under it, so each conditional
//! write is atomic with respect to every other call.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::ballot::{Agenda, BallotError, Session, Vote};
use crate::domain::foundation::{AgendaId, SessionId};
use crate::ports::{
    AgendaPage, BallotStore, ClosedAgenda, ListOptions, StoreError, VersionedAgenda,
};

#[derive(Debug, Default)]
struct State {
    agendas: HashMap<AgendaId, VersionedAgenda>,
    session_index: HashMap<SessionId, AgendaId>,
}

impl State {
    fn index_sessions(&mut self, agenda: &Agenda) {
        for session in agenda.sessions() {
            self.session_index.insert(*session.id(), *agenda.id());
        }
    }
}

/// In-memory storage for agendas, sessions and votes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBallotStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryBallotStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored agendas
    pub async fn agenda_count(&self) -> usize {
        self.state.read().await.agendas.len()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.agendas.clear();
        state.session_index.clear();
    }
}

#[async_trait]
impl BallotStore for InMemoryBallotStore {
    async fn insert_agenda(&self, agenda: &Agenda) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.agendas.contains_key(agenda.id()) {
            return Err(StoreError::AlreadyExists(*agenda.id()));
        }
        state.index_sessions(agenda);
        state.agendas.insert(
            *agenda.id(),
            VersionedAgenda {
                agenda: agenda.clone(),
                version: 1,
            },
        );
        Ok(())
    }

    async fn find_agenda(&self, id: &AgendaId) -> Result<Option<VersionedAgenda>, StoreError> {
        Ok(self.state.read().await.agendas.get(id).cloned())
    }

    async fn find_agenda_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<VersionedAgenda>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .session_index
            .get(session_id)
            .and_then(|agenda_id| state.agendas.get(agenda_id))
            .cloned())
    }

    async fn list_agendas(&self, options: &ListOptions) -> Result<AgendaPage, StoreError> {
        let state = self.state.read().await;
        let mut all: Vec<&Agenda> = state.agendas.values().map(|v| &v.agenda).collect();
        all.sort_by(|a, b| {
            a.created_at()
                .cmp(b.created_at())
                .then_with(|| a.id().as_uuid().cmp(b.id().as_uuid()))
        });

        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(options.effective_offset() as usize)
            .take(options.effective_limit() as usize)
            .cloned()
            .collect();
        Ok(AgendaPage::new(items, total, options))
    }

    async fn find_agendas_with_open_sessions(&self) -> Result<Vec<Agenda>, StoreError> {
        let state = self.state.read().await;
        let mut found: Vec<Agenda> = state
            .agendas
            .values()
            .filter(|v| v.agenda.sessions().iter().any(|s| s.status().is_open()))
            .map(|v| v.agenda.clone())
            .collect();
        found.sort_by(|a, b| a.created_at().cmp(b.created_at()));
        Ok(found)
    }

    async fn replace_agenda(
        &self,
        agenda: &Agenda,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let entry = state
            .agendas
            .get_mut(agenda.id())
            .ok_or(StoreError::AgendaNotFound(*agenda.id()))?;

        if entry.version != expected_version {
            return Err(StoreError::Conflict(*agenda.id()));
        }

        entry.agenda = agenda.clone();
        entry.version += 1;
        let version = entry.version;
        state.index_sessions(agenda);
        Ok(version)
    }

    async fn append_vote(&self, session_id: &SessionId, vote: &Vote) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let agenda_id = *state
            .session_index
            .get(session_id)
            .ok_or(StoreError::SessionNotFound(*session_id))?;
        let entry = state
            .agendas
            .get_mut(&agenda_id)
            .ok_or(StoreError::SessionNotFound(*session_id))?;
        let session = entry
            .agenda
            .session_mut(session_id)
            .ok_or(StoreError::SessionNotFound(*session_id))?;

        session.accept_vote(vote.clone()).map_err(|e| match e {
            BallotError::DuplicateVote(id) => StoreError::DuplicateVote(id),
            other => StoreError::PreconditionFailed(other.message()),
        })?;
        entry.version += 1;
        Ok(())
    }

    async fn close_session(&self, session_id: &SessionId) -> Result<Session, StoreError> {
        let mut state = self.state.write().await;
        let agenda_id = *state
            .session_index
            .get(session_id)
            .ok_or(StoreError::SessionNotFound(*session_id))?;
        let entry = state
            .agendas
            .get_mut(&agenda_id)
            .ok_or(StoreError::SessionNotFound(*session_id))?;
        let session = entry
            .agenda
            .session_mut(session_id)
            .ok_or(StoreError::SessionNotFound(*session_id))?;

        let changed = session.close();
        let session = session.clone();
        if changed {
            entry.version += 1;
        }
        Ok(session)
    }

    async fn close_agenda(&self, agenda_id: &AgendaId) -> Result<ClosedAgenda, StoreError> {
        let mut state = self.state.write().await;
        let entry = state
            .agendas
            .get_mut(agenda_id)
            .ok_or(StoreError::AgendaNotFound(*agenda_id))?;

        let closed_sessions = entry.agenda.close().map_err(|e| match e {
            BallotError::AgendaAlreadyClosed(id) => StoreError::AgendaClosed(id),
            other => StoreError::PreconditionFailed(other.message()),
        })?;
        entry.version += 1;
        Ok(ClosedAgenda {
            agenda: entry.agenda.clone(),
            closed_sessions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ballot::VoteType;
    use crate::domain::foundation::{Cpf, Timestamp, UserId};

    fn t0() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    fn agenda_at(created_at: Timestamp) -> Agenda {
        Agenda::new(
            AgendaId::new(),
            "Budget".to_string(),
            String::new(),
            UserId::new("admin").unwrap(),
            created_at,
        )
        .unwrap()
    }

    fn vote(cpf: &str, at: Timestamp) -> Vote {
        Vote::new(
            UserId::new("voter").unwrap(),
            Cpf::parse(cpf).unwrap(),
            VoteType::Yes,
            at,
        )
    }

    /// Stores an agenda with one session running from t0 for ten minutes.
    async fn store_with_session() -> (InMemoryBallotStore, AgendaId, SessionId) {
        let store = InMemoryBallotStore::new();
        let mut agenda = agenda_at(t0().plus_minutes(-5));
        store.insert_agenda(&agenda).await.unwrap();
        let session_id = *agenda
            .open_session(t0(), 10, t0().plus_minutes(-1))
            .unwrap()
            .id();
        store.replace_agenda(&agenda, 1).await.unwrap();
        (store, *agenda.id(), session_id)
    }

    #[tokio::test]
    async fn insert_then_find_returns_version_one() {
        let store = InMemoryBallotStore::new();
        let agenda = agenda_at(t0());
        store.insert_agenda(&agenda).await.unwrap();

        let found = store.find_agenda(agenda.id()).await.unwrap().unwrap();
        assert_eq!(found.version, 1);
        assert_eq!(found.agenda, agenda);
    }

    #[tokio::test]
    async fn insert_twice_is_rejected() {
        let store = InMemoryBallotStore::new();
        let agenda = agenda_at(t0());
        store.insert_agenda(&agenda).await.unwrap();
        assert_eq!(
            store.insert_agenda(&agenda).await,
            Err(StoreError::AlreadyExists(*agenda.id()))
        );
    }

    #[tokio::test]
    async fn replace_with_stale_version_conflicts() {
        let (store, agenda_id, _) = store_with_session().await;
        let current = store.find_agenda(&agenda_id).await.unwrap().unwrap();
        assert_eq!(current.version, 2);

        let result = store.replace_agenda(&current.agenda, 1).await;
        assert_eq!(result, Err(StoreError::Conflict(agenda_id)));
    }

    #[tokio::test]
    async fn replace_unknown_agenda_is_not_found() {
        let store = InMemoryBallotStore::new();
        let agenda = agenda_at(t0());
        assert_eq!(
            store.replace_agenda(&agenda, 1).await,
            Err(StoreError::AgendaNotFound(*agenda.id()))
        );
    }

    #[tokio::test]
    async fn find_by_session_returns_owner() {
        let (store, agenda_id, session_id) = store_with_session().await;
        let found = store
            .find_agenda_by_session(&session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.agenda.id(), &agenda_id);
        assert!(store
            .find_agenda_by_session(&SessionId::new())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn append_vote_bumps_version() {
        let (store, agenda_id, session_id) = store_with_session().await;
        store
            .append_vote(&session_id, &vote("11111111111", t0().plus_minutes(1)))
            .await
            .unwrap();

        let found = store.find_agenda(&agenda_id).await.unwrap().unwrap();
        assert_eq!(found.version, 3);
        assert_eq!(found.agenda.session(&session_id).unwrap().vote_count(), 1);
    }

    #[tokio::test]
    async fn append_duplicate_cpf_is_rejected() {
        let (store, _, session_id) = store_with_session().await;
        store
            .append_vote(&session_id, &vote("11111111111", t0().plus_minutes(1)))
            .await
            .unwrap();

        let result = store
            .append_vote(&session_id, &vote("11111111111", t0().plus_minutes(2)))
            .await;
        assert_eq!(result, Err(StoreError::DuplicateVote(session_id)));
    }

    #[tokio::test]
    async fn append_outside_window_fails_precondition() {
        let (store, _, session_id) = store_with_session().await;
        let result = store
            .append_vote(&session_id, &vote("11111111111", t0().plus_minutes(10)))
            .await;
        assert!(matches!(result, Err(StoreError::PreconditionFailed(_))));
    }

    #[tokio::test]
    async fn append_to_closed_session_fails_precondition() {
        let (store, agenda_id, session_id) = store_with_session().await;
        let mut current = store.find_agenda(&agenda_id).await.unwrap().unwrap();
        current.agenda.close_session(&session_id).unwrap();
        store
            .replace_agenda(&current.agenda, current.version)
            .await
            .unwrap();

        let result = store
            .append_vote(&session_id, &vote("11111111111", t0().plus_minutes(1)))
            .await;
        assert!(matches!(result, Err(StoreError::PreconditionFailed(_))));
    }

    #[tokio::test]
    async fn stale_replace_cannot_drop_a_vote() {
        let (store, agenda_id, session_id) = store_with_session().await;
        let stale = store.find_agenda(&agenda_id).await.unwrap().unwrap();

        store
            .append_vote(&session_id, &vote("11111111111", t0().plus_minutes(1)))
            .await
            .unwrap();

        let mut closing = stale.agenda.clone();
        closing.close_session(&session_id).unwrap();
        let result = store.replace_agenda(&closing, stale.version).await;
        assert_eq!(result, Err(StoreError::Conflict(agenda_id)));

        let current = store.find_agenda(&agenda_id).await.unwrap().unwrap();
        assert_eq!(current.agenda.session(&session_id).unwrap().vote_count(), 1);
    }

    #[tokio::test]
    async fn close_session_ignores_version_and_keeps_votes() {
        let (store, agenda_id, session_id) = store_with_session().await;
        store
            .append_vote(&session_id, &vote("11111111111", t0().plus_minutes(1)))
            .await
            .unwrap();

        let closed = store.close_session(&session_id).await.unwrap();
        assert!(!closed.status().is_open());
        assert_eq!(closed.vote_count(), 1);

        let current = store.find_agenda(&agenda_id).await.unwrap().unwrap();
        assert_eq!(current.version, 4);
        assert_eq!(current.agenda.session(&session_id).unwrap(), &closed);
    }

    #[tokio::test]
    async fn close_session_twice_leaves_version_alone() {
        let (store, agenda_id, session_id) = store_with_session().await;
        store.close_session(&session_id).await.unwrap();
        let version = store.find_agenda(&agenda_id).await.unwrap().unwrap().version;

        let again = store.close_session(&session_id).await.unwrap();
        assert!(!again.status().is_open());
        assert_eq!(
            store.find_agenda(&agenda_id).await.unwrap().unwrap().version,
            version
        );
    }

    #[tokio::test]
    async fn close_unknown_session_is_not_found() {
        let store = InMemoryBallotStore::new();
        let missing = SessionId::new();
        assert_eq!(
            store.close_session(&missing).await,
            Err(StoreError::SessionNotFound(missing))
        );
    }

    #[tokio::test]
    async fn close_agenda_closes_open_sessions() {
        let (store, agenda_id, session_id) = store_with_session().await;
        store
            .append_vote(&session_id, &vote("11111111111", t0().plus_minutes(1)))
            .await
            .unwrap();

        let closed = store.close_agenda(&agenda_id).await.unwrap();
        assert_eq!(closed.closed_sessions, vec![session_id]);
        assert!(closed.agenda.status().is_closed());
        let session = closed.agenda.session(&session_id).unwrap();
        assert!(!session.status().is_open());
        assert_eq!(session.vote_count(), 1);

        let result = store
            .append_vote(&session_id, &vote("22222222222", t0().plus_minutes(2)))
            .await;
        assert!(matches!(result, Err(StoreError::PreconditionFailed(_))));
    }

    #[tokio::test]
    async fn close_agenda_twice_is_rejected() {
        let (store, agenda_id, _) = store_with_session().await;
        store.close_agenda(&agenda_id).await.unwrap();
        assert_eq!(
            store.close_agenda(&agenda_id).await,
            Err(StoreError::AgendaClosed(agenda_id))
        );
        let missing = AgendaId::new();
        assert_eq!(
            store.close_agenda(&missing).await,
            Err(StoreError::AgendaNotFound(missing))
        );
    }

    #[tokio::test]
    async fn append_to_unknown_session_is_not_found() {
        let store = InMemoryBallotStore::new();
        let missing = SessionId::new();
        assert_eq!(
            store.append_vote(&missing, &vote("11111111111", t0())).await,
            Err(StoreError::SessionNotFound(missing))
        );
    }

    #[tokio::test]
    async fn list_orders_by_creation_and_paginates() {
        let store = InMemoryBallotStore::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            let agenda = agenda_at(t0().plus_minutes(5 - i));
            ids.push(*agenda.id());
            store.insert_agenda(&agenda).await.unwrap();
        }
        ids.reverse();

        let page = store
            .list_agendas(&ListOptions::paginated(1, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert!(page.has_more);
        let got: Vec<AgendaId> = page.items.iter().map(|a| *a.id()).collect();
        assert_eq!(got, ids[0..2].to_vec());

        let last = store
            .list_agendas(&ListOptions::paginated(3, 2))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn open_sessions_query_skips_closed_ones() {
        let (store, agenda_id, session_id) = store_with_session().await;
        store.insert_agenda(&agenda_at(t0())).await.unwrap();

        let open = store.find_agendas_with_open_sessions().await.unwrap();
        assert_eq!(open.len(), 1);

        let mut current = store.find_agenda(&agenda_id).await.unwrap().unwrap();
        current.agenda.close_session(&session_id).unwrap();
        store
            .replace_agenda(&current.agenda, current.version)
            .await
            .unwrap();
        assert!(store.find_agendas_with_open_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let (store, _, session_id) = store_with_session().await;
        store.clear().await;
        assert_eq!(store.agenda_count().await, 0);
        assert!(store
            .find_agenda_by_session(&session_id)
            .await
            .unwrap()
            .is_none());
    }
}
