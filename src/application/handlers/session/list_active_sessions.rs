//! ListActiveSessionsHandler - Query handler for sessions that are still
//! open and have not reached their end time. Scheduled sessions are included.

use std::sync::Arc;

use crate::domain::ballot::{BallotError, Session};
use crate::ports::{BallotStore, Clock};

/// Query to list active sessions across all agendas.
#[derive(Debug, Clone, Default)]
pub struct ListActiveSessionsQuery;

/// Handler for listing active sessions.
pub struct ListActiveSessionsHandler {
    store: Arc<dyn BallotStore>,
    clock: Arc<dyn Clock>,
}

impl ListActiveSessionsHandler {
    pub fn new(store: Arc<dyn BallotStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn handle(&self, _query: ListActiveSessionsQuery) -> Result<Vec<Session>, BallotError> {
        let now = self.clock.now();
        let agendas = self.store.find_agendas_with_open_sessions().await?;

        let sessions: Vec<Session> = agendas
            .iter()
            .flat_map(|a| a.sessions().iter())
            .filter(|s| s.is_active(&now))
            .cloned()
            .collect();

        tracing::debug!(count = sessions.len(), "Listed active sessions");
        Ok(sessions)
    }
}
