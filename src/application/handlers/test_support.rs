//! Fixtures shared by handler tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::adapters::clock::ManualClock;
use crate::adapters::storage::InMemoryBallotStore;
use crate::domain::ballot::{Agenda, Session, Vote};
use crate::domain::foundation::{AgendaId, SessionId, Timestamp, UserId};
use crate::ports::{
    AgendaPage, BallotStore, ClosedAgenda, ListOptions, StoreError, VersionedAgenda,
};

pub fn t0() -> Timestamp {
    Timestamp::from_unix_secs(1_700_000_000).unwrap()
}

pub fn clock_at(at: Timestamp) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(at))
}

/// Stores a pending agenda created at `t0 - 1h`.
pub async fn seed_agenda(store: &InMemoryBallotStore) -> AgendaId {
    let agenda = Agenda::new(
        AgendaId::new(),
        "Approve budget".to_string(),
        String::new(),
        UserId::new("admin").unwrap(),
        t0().plus_minutes(-60),
    )
    .unwrap();
    store.insert_agenda(&agenda).await.unwrap();
    *agenda.id()
}

/// Stores an agenda with one session running from `t0` for ten minutes.
pub async fn seed_session(store: &InMemoryBallotStore) -> (AgendaId, SessionId) {
    let agenda_id = seed_agenda(store).await;
    let mut current = store.find_agenda(&agenda_id).await.unwrap().unwrap();
    let session_id = *current
        .agenda
        .open_session(t0(), 10, t0().plus_minutes(-1))
        .unwrap()
        .id();
    store
        .replace_agenda(&current.agenda, current.version)
        .await
        .unwrap();
    (agenda_id, session_id)
}

/// Store wrapper whose next `n` version-checked writes lose a race.
///
/// Closes never compare versions, so they pass straight through.
pub struct RacingStore {
    inner: InMemoryBallotStore,
    conflicts_left: AtomicU32,
    replace_calls: AtomicU32,
}

impl RacingStore {
    pub fn new(inner: InMemoryBallotStore, conflicts: u32) -> Self {
        Self {
            inner,
            conflicts_left: AtomicU32::new(conflicts),
            replace_calls: AtomicU32::new(0),
        }
    }

    pub fn replace_calls(&self) -> u32 {
        self.replace_calls.load(Ordering::SeqCst)
    }

    fn lose_race(&self) -> bool {
        self.conflicts_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl BallotStore for RacingStore {
    async fn insert_agenda(&self, agenda: &Agenda) -> Result<(), StoreError> {
        self.inner.insert_agenda(agenda).await
    }

    async fn find_agenda(&self, id: &AgendaId) -> Result<Option<VersionedAgenda>, StoreError> {
        self.inner.find_agenda(id).await
    }

    async fn find_agenda_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<VersionedAgenda>, StoreError> {
        self.inner.find_agenda_by_session(session_id).await
    }

    async fn list_agendas(&self, options: &ListOptions) -> Result<AgendaPage, StoreError> {
        self.inner.list_agendas(options).await
    }

    async fn find_agendas_with_open_sessions(&self) -> Result<Vec<Agenda>, StoreError> {
        self.inner.find_agendas_with_open_sessions().await
    }

    async fn replace_agenda(
        &self,
        agenda: &Agenda,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        if self.lose_race() {
            return Err(StoreError::Conflict(*agenda.id()));
        }
        self.inner.replace_agenda(agenda, expected_version).await
    }

    async fn append_vote(&self, session_id: &SessionId, vote: &Vote) -> Result<(), StoreError> {
        if self.lose_race() {
            return Err(StoreError::PreconditionFailed("lost race".to_string()));
        }
        self.inner.append_vote(session_id, vote).await
    }

    async fn close_session(&self, session_id: &SessionId) -> Result<Session, StoreError> {
        self.inner.close_session(session_id).await
    }

    async fn close_agenda(&self, agenda_id: &AgendaId) -> Result<ClosedAgenda, StoreError> {
        self.inner.close_agenda(agenda_id).await
    }
}

/// Store whose every call fails with a database error.
pub struct BrokenStore;

#[async_trait]
impl BallotStore for BrokenStore {
    async fn insert_agenda(&self, _agenda: &Agenda) -> Result<(), StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn find_agenda(&self, _id: &AgendaId) -> Result<Option<VersionedAgenda>, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn find_agenda_by_session(
        &self,
        _session_id: &SessionId,
    ) -> Result<Option<VersionedAgenda>, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn list_agendas(&self, _options: &ListOptions) -> Result<AgendaPage, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn find_agendas_with_open_sessions(&self) -> Result<Vec<Agenda>, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn replace_agenda(
        &self,
        _agenda: &Agenda,
        _expected_version: u64,
    ) -> Result<u64, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn append_vote(&self, _session_id: &SessionId, _vote: &Vote) -> Result<(), StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn close_session(&self, _session_id: &SessionId) -> Result<Session, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn close_agenda(&self, _agenda_id: &AgendaId) -> Result<ClosedAgenda, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }
}
