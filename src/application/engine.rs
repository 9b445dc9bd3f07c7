//! BallotEngine - the whole command and query surface behind one value.
//!
//! Builds every handler from the same store, clock and eligibility checker.
//! Cheap to share: wrap it in an `Arc` and clone the handle.

use std::sync::Arc;

use crate::domain::ballot::{Agenda, BallotError, Session, Vote, VoteResult, VoteType};
use crate::domain::foundation::{AgendaId, SessionId, Timestamp};
use crate::ports::{AgendaPage, BallotStore, Clock, EligibilityChecker, ListOptions};

use super::handlers::{
    CloseAgendaCommand, CloseAgendaHandler, CloseAgendaResult, CloseSessionCommand,
    CloseSessionHandler, CreateAgendaCommand, CreateAgendaHandler, FindAgendaBySessionQuery,
    GetAgendaHandler, GetAgendaQuery, GetSessionHandler, GetSessionQuery,
    ListActiveSessionsHandler, ListActiveSessionsQuery, ListAgendasHandler, ListAgendasQuery,
    OpenSessionCommand, OpenSessionHandler, RegisterVoteCommand, RegisterVoteHandler,
    SessionResultQuery, TallySessionHandler, TallySessionQuery,
};
use super::EngineSettings;

/// Session lifecycle and ballot-integrity engine.
pub struct BallotEngine {
    create_agenda: CreateAgendaHandler,
    close_agenda: CloseAgendaHandler,
    get_agenda: GetAgendaHandler,
    list_agendas: ListAgendasHandler,
    open_session: OpenSessionHandler,
    close_session: CloseSessionHandler,
    get_session: GetSessionHandler,
    list_active_sessions: ListActiveSessionsHandler,
    register_vote: RegisterVoteHandler,
    tally: TallySessionHandler,
}

impl BallotEngine {
    pub fn new(
        store: Arc<dyn BallotStore>,
        clock: Arc<dyn Clock>,
        eligibility: Arc<dyn EligibilityChecker>,
        settings: EngineSettings,
    ) -> Self {
        let attempts = settings.max_write_attempts;
        Self {
            create_agenda: CreateAgendaHandler::new(store.clone(), clock.clone()),
            close_agenda: CloseAgendaHandler::new(store.clone()),
            get_agenda: GetAgendaHandler::new(store.clone()),
            list_agendas: ListAgendasHandler::new(store.clone()),
            open_session: OpenSessionHandler::new(store.clone(), clock.clone(), attempts),
            close_session: CloseSessionHandler::new(store.clone()),
            get_session: GetSessionHandler::new(store.clone()),
            list_active_sessions: ListActiveSessionsHandler::new(store.clone(), clock.clone()),
            register_vote: RegisterVoteHandler::new(
                store.clone(),
                clock,
                eligibility,
                settings.eligibility_timeout,
                attempts,
            ),
            tally: TallySessionHandler::new(store),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_agenda(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Result<Agenda, BallotError> {
        self.create_agenda
            .handle(CreateAgendaCommand {
                title: title.into(),
                description: description.into(),
                created_by: created_by.into(),
            })
            .await
    }

    pub async fn open_session(
        &self,
        agenda_id: AgendaId,
        start_time: Timestamp,
        duration_minutes: i64,
    ) -> Result<Session, BallotError> {
        self.open_session
            .handle(OpenSessionCommand {
                agenda_id,
                start_time,
                duration_minutes,
            })
            .await
    }

    pub async fn close_session(&self, session_id: SessionId) -> Result<Session, BallotError> {
        self.close_session
            .handle(CloseSessionCommand { session_id })
            .await
    }

    pub async fn close_agenda(&self, agenda_id: AgendaId) -> Result<CloseAgendaResult, BallotError> {
        self.close_agenda
            .handle(CloseAgendaCommand { agenda_id })
            .await
    }

    pub async fn register_vote(
        &self,
        session_id: SessionId,
        user_id: impl Into<String>,
        cpf: impl Into<String>,
        vote_type: VoteType,
    ) -> Result<Vote, BallotError> {
        self.register_vote
            .handle(RegisterVoteCommand {
                session_id,
                user_id: user_id.into(),
                cpf: cpf.into(),
                vote_type,
            })
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Votes so far; the session may still be open.
    pub async fn tally(&self, session_id: SessionId) -> Result<VoteResult, BallotError> {
        self.tally.handle(TallySessionQuery { session_id }).await
    }

    /// Final result; fails with `SessionNotClosed` while the session is open.
    pub async fn session_result(&self, session_id: SessionId) -> Result<VoteResult, BallotError> {
        self.tally
            .handle_result(SessionResultQuery { session_id })
            .await
    }

    pub async fn find_agenda(&self, agenda_id: AgendaId) -> Result<Agenda, BallotError> {
        self.get_agenda.handle(GetAgendaQuery { agenda_id }).await
    }

    pub async fn find_agenda_by_session(&self, session_id: SessionId) -> Result<Agenda, BallotError> {
        self.get_agenda
            .handle_by_session(FindAgendaBySessionQuery { session_id })
            .await
    }

    pub async fn find_session(&self, session_id: SessionId) -> Result<Session, BallotError> {
        self.get_session.handle(GetSessionQuery { session_id }).await
    }

    pub async fn list_agendas(&self, options: ListOptions) -> Result<AgendaPage, BallotError> {
        self.list_agendas.handle(ListAgendasQuery { options }).await
    }

    pub async fn list_active_sessions(&self) -> Result<Vec<Session>, BallotError> {
        self.list_active_sessions
            .handle(ListActiveSessionsQuery)
            .await
    }
}
