//! CreateAgendaHandler - Command handler for creating agendas.

use std::sync::Arc;

use crate::domain::ballot::{Agenda, BallotError};
use crate::domain::foundation::{AgendaId, UserId};
use crate::ports::{BallotStore, Clock};

/// Command to create a new agenda.
#[derive(Debug, Clone)]
pub struct CreateAgendaCommand {
    pub title: String,
    pub description: String,
    pub created_by: String,
}

/// Handler for creating agendas.
pub struct CreateAgendaHandler {
    store: Arc<dyn BallotStore>,
    clock: Arc<dyn Clock>,
}

impl CreateAgendaHandler {
    pub fn new(store: Arc<dyn BallotStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn handle(&self, cmd: CreateAgendaCommand) -> Result<Agenda, BallotError> {
        let created_by = UserId::new(cmd.created_by)?;
        let agenda = Agenda::new(
            AgendaId::new(),
            cmd.title,
            cmd.description,
            created_by,
            self.clock.now(),
        )?;

        self.store.insert_agenda(&agenda).await?;

        tracing::info!(agenda_id = %agenda.id(), title = %agenda.title(), "Agenda created");
        Ok(agenda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryBallotStore;
    use crate::application::handlers::test_support::{clock_at, t0, BrokenStore};
    use crate::domain::foundation::{AgendaStatus, ErrorCode};

    fn command(title: &str, created_by: &str) -> CreateAgendaCommand {
        CreateAgendaCommand {
            title: title.to_string(),
            description: "Yearly budget".to_string(),
            created_by: created_by.to_string(),
        }
    }

    #[tokio::test]
    async fn creates_pending_agenda_stamped_with_clock() {
        let store = Arc::new(InMemoryBallotStore::new());
        let handler = CreateAgendaHandler::new(store.clone(), clock_at(t0()));

        let agenda = handler.handle(command("Budget", "admin")).await.unwrap();

        assert_eq!(agenda.status(), AgendaStatus::Pending);
        assert_eq!(agenda.created_at(), &t0());
        let stored = store.find_agenda(agenda.id()).await.unwrap().unwrap();
        assert_eq!(stored.agenda, agenda);
    }

    #[tokio::test]
    async fn rejects_blank_creator() {
        let store = Arc::new(InMemoryBallotStore::new());
        let handler = CreateAgendaHandler::new(store.clone(), clock_at(t0()));

        let err = handler.handle(command("Budget", "  ")).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(store.agenda_count().await, 0);
    }

    #[tokio::test]
    async fn rejects_empty_title() {
        let handler =
            CreateAgendaHandler::new(Arc::new(InMemoryBallotStore::new()), clock_at(t0()));
        let err = handler.handle(command("", "admin")).await.unwrap_err();
        assert!(matches!(err, BallotError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn store_failure_is_infrastructure_error() {
        let handler = CreateAgendaHandler::new(Arc::new(BrokenStore), clock_at(t0()));
        let err = handler.handle(command("Budget", "admin")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }
}
