//! CloseSessionHandler - Command handler for closing a voting session.
//!
//! Idempotent: closing a closed session returns it unchanged. Votes are
//! never touched. The store flips the status under the agenda lock without
//! comparing versions, so concurrent votes cannot make the close fail.

use std::sync::Arc;

use crate::domain::ballot::{BallotError, Session};
use crate::domain::foundation::SessionId;
use crate::ports::BallotStore;

/// Command to close a session.
#[derive(Debug, Clone)]
pub struct CloseSessionCommand {
    pub session_id: SessionId,
}

/// Handler for closing sessions.
pub struct CloseSessionHandler {
    store: Arc<dyn BallotStore>,
}

impl CloseSessionHandler {
    pub fn new(store: Arc<dyn BallotStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: CloseSessionCommand) -> Result<Session, BallotError> {
        let session = self.store.close_session(&cmd.session_id).await?;

        tracing::info!(
            agenda_id = %session.agenda_id(),
            session_id = %cmd.session_id,
            votes = session.vote_count(),
            "Session closed"
        );
        Ok(session)
    }
}
