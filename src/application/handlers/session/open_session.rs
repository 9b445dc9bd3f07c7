//! OpenSessionHandler - Command handler for opening voting sessions.
//!
//! Preconditions are checked against a fresh read of the agenda and the new
//! session is appended with a version-guarded replace. A lost race re-reads
//! and re-validates, so a concurrent winner turns into `SessionAlreadyActive`
//! for everyone else.

use std::sync::Arc;

use crate::domain::ballot::{BallotError, Session};
use crate::domain::foundation::{AgendaId, Timestamp};
use crate::ports::{BallotStore, Clock, StoreError};

/// Command to open a session on an agenda.
#[derive(Debug, Clone)]
pub struct OpenSessionCommand {
    pub agenda_id: AgendaId,
    pub start_time: Timestamp,
    pub duration_minutes: i64,
}

/// Handler for opening sessions.
pub struct OpenSessionHandler {
    store: Arc<dyn BallotStore>,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
}

impl OpenSessionHandler {
    pub fn new(store: Arc<dyn BallotStore>, clock: Arc<dyn Clock>, max_attempts: u32) -> Self {
        Self {
            store,
            clock,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn handle(&self, cmd: OpenSessionCommand) -> Result<Session, BallotError> {
        for attempt in 1..=self.max_attempts {
            let current = self
                .store
                .find_agenda(&cmd.agenda_id)
                .await?
                .ok_or(BallotError::AgendaNotFound(cmd.agenda_id))?;

            let now = self.clock.now();
            let mut agenda = current.agenda;
            let session = agenda
                .open_session(cmd.start_time, cmd.duration_minutes, now)
                .map_err(|e| {
                    tracing::warn!(agenda_id = %cmd.agenda_id, code = %e.code(), "Session rejected");
                    e
                })?
                .clone();

            match self.store.replace_agenda(&agenda, current.version).await {
                Ok(_) => {
                    tracing::info!(
                        agenda_id = %cmd.agenda_id,
                        session_id = %session.id(),
                        start_time = %session.start_time(),
                        end_time = %session.end_time(),
                        "Session opened"
                    );
                    return Ok(session);
                }
                Err(StoreError::Conflict(_)) => {
                    tracing::warn!(agenda_id = %cmd.agenda_id, attempt, "Session open lost a race, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        // Still losing: report the blocking session if one exists now.
        let current = self
            .store
            .find_agenda(&cmd.agenda_id)
            .await?
            .ok_or(BallotError::AgendaNotFound(cmd.agenda_id))?;
        if current.agenda.has_active_session(&self.clock.now()) {
            return Err(BallotError::SessionAlreadyActive(cmd.agenda_id));
        }
        Err(BallotError::contended(format!(
            "Agenda {} kept changing while opening a session",
            cmd.agenda_id
        )))
    }
}
