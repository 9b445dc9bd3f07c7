//! GetSessionHandler - Query handler for a single session.

use std::sync::Arc;

use crate::domain::ballot::{BallotError, Session};
use crate::domain::foundation::SessionId;
use crate::ports::BallotStore;

/// Query to get a session by id.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for session lookups.
pub struct GetSessionHandler {
    store: Arc<dyn BallotStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn BallotStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<Session, BallotError> {
        tracing::debug!(session_id = %query.session_id, "Loading session");
        self.store
            .find_agenda_by_session(&query.session_id)
            .await?
            .and_then(|v| v.agenda.session(&query.session_id).cloned())
            .ok_or(BallotError::SessionNotFound(query.session_id))
    }
}
