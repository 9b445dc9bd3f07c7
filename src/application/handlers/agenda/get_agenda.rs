//! Agenda read queries.

use std::sync::Arc;

use crate::domain::ballot::{Agenda, BallotError};
use crate::domain::foundation::{AgendaId, SessionId};
use crate::ports::BallotStore;

/// Query to get an agenda by id.
#[derive(Debug, Clone)]
pub struct GetAgendaQuery {
    pub agenda_id: AgendaId,
}

/// Query to get the agenda owning a session.
#[derive(Debug, Clone)]
pub struct FindAgendaBySessionQuery {
    pub session_id: SessionId,
}

/// Handler for agenda lookups.
pub struct GetAgendaHandler {
    store: Arc<dyn BallotStore>,
}

impl GetAgendaHandler {
    pub fn new(store: Arc<dyn BallotStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetAgendaQuery) -> Result<Agenda, BallotError> {
        tracing::debug!(agenda_id = %query.agenda_id, "Loading agenda");
        self.store
            .find_agenda(&query.agenda_id)
            .await?
            .map(|v| v.agenda)
            .ok_or(BallotError::AgendaNotFound(query.agenda_id))
    }

    pub async fn handle_by_session(
        &self,
        query: FindAgendaBySessionQuery,
    ) -> Result<Agenda, BallotError> {
        tracing::debug!(session_id = %query.session_id, "Loading agenda by session");
        self.store
            .find_agenda_by_session(&query.session_id)
            .await?
            .map(|v| v.agenda)
            .ok_or(BallotError::SessionNotFound(query.session_id))
    }
}
