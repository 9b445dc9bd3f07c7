//! ListAgendasHandler - Query handler for paginated agenda listings.

use std::sync::Arc;

use crate::domain::ballot::BallotError;
use crate::ports::{AgendaPage, BallotStore, ListOptions};

/// Query to list agendas, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ListAgendasQuery {
    pub options: ListOptions,
}

/// Handler for listing agendas.
pub struct ListAgendasHandler {
    store: Arc<dyn BallotStore>,
}

impl ListAgendasHandler {
    pub fn new(store: Arc<dyn BallotStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: ListAgendasQuery) -> Result<AgendaPage, BallotError> {
        Ok(self.store.list_agendas(&query.options).await?)
    }
}
