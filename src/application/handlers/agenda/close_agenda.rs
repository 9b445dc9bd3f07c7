//! CloseAgendaHandler - Command handler for closing agendas.
//!
//! Closing an agenda closes every open session in the same store write.
//! A second close is an error, not a no-op.

use std::sync::Arc;

use crate::domain::ballot::{Agenda, BallotError};
use crate::domain::foundation::{AgendaId, SessionId};
use crate::ports::BallotStore;

/// Command to close an agenda.
#[derive(Debug, Clone)]
pub struct CloseAgendaCommand {
    pub agenda_id: AgendaId,
}

/// Result of a successful agenda close.
#[derive(Debug, Clone)]
pub struct CloseAgendaResult {
    pub agenda: Agenda,
    /// Sessions that were open and got closed by this command.
    pub closed_sessions: Vec<SessionId>,
}

/// Handler for closing agendas.
pub struct CloseAgendaHandler {
    store: Arc<dyn BallotStore>,
}

impl CloseAgendaHandler {
    pub fn new(store: Arc<dyn BallotStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: CloseAgendaCommand) -> Result<CloseAgendaResult, BallotError> {
        let closed = self.store.close_agenda(&cmd.agenda_id).await?;

        tracing::info!(
            agenda_id = %cmd.agenda_id,
            closed_sessions = closed.closed_sessions.len(),
            "Agenda closed"
        );
        Ok(CloseAgendaResult {
            agenda: closed.agenda,
            closed_sessions: closed.closed_sessions,
        })
    }
}
