//! Tally queries.
//!
//! `TallySessionQuery` counts the votes recorded so far, open session or not.
//! `SessionResultQuery` is the final result and requires the session to be
//! closed.

use std::sync::Arc;

use crate::domain::ballot::{BallotError, Session, VoteResult};
use crate::domain::foundation::SessionId;
use crate::ports::BallotStore;

/// Query to tally a session as it stands.
#[derive(Debug, Clone)]
pub struct TallySessionQuery {
    pub session_id: SessionId,
}

/// Query for the final result of a closed session.
#[derive(Debug, Clone)]
pub struct SessionResultQuery {
    pub session_id: SessionId,
}

/// Handler for tally and result queries.
pub struct TallySessionHandler {
    store: Arc<dyn BallotStore>,
}

impl TallySessionHandler {
    pub fn new(store: Arc<dyn BallotStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: TallySessionQuery) -> Result<VoteResult, BallotError> {
        let session = self.load(&query.session_id).await?;
        Ok(session.tally())
    }

    pub async fn handle_result(&self, query: SessionResultQuery) -> Result<VoteResult, BallotError> {
        let session = self.load(&query.session_id).await?;
        if session.status().is_open() {
            return Err(BallotError::SessionNotClosed(query.session_id));
        }

        let result = session.tally();
        tracing::info!(
            session_id = %query.session_id,
            yes = result.yes_count,
            no = result.no_count,
            winner = %result.winner,
            "Session result computed"
        );
        Ok(result)
    }

    async fn load(&self, session_id: &SessionId) -> Result<Session, BallotError> {
        self.store
            .find_agenda_by_session(session_id)
            .await?
            .and_then(|v| v.agenda.session(session_id).cloned())
            .ok_or(BallotError::SessionNotFound(*session_id))
    }
}
