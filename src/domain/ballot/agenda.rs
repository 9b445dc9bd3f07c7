//! Agenda aggregate.
//!
//! The agenda is the consistency boundary: it owns its sessions, and the
//! sessions own their votes. Every invariant that spans sessions (one active
//! session at a time, closing cascades) is checked here.

use serde::{Deserialize, Serialize};

use super::{BallotError, Session};
use crate::domain::foundation::{
    AgendaId, AgendaStatus, SessionId, StateMachine, Timestamp, UserId, ValidationError,
};

/// Maximum length for agenda title.
pub const MAX_TITLE_LENGTH: usize = 500;

/// Maximum length for agenda description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Agenda aggregate - a topic put to vote.
///
/// # Invariants
///
/// - `title` is 1-500 characters, non-empty
/// - sessions are kept in creation order
/// - at most one session is active at any instant
/// - a closed agenda has no open session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    id: AgendaId,
    title: String,
    description: String,
    created_by: UserId,
    created_at: Timestamp,
    status: AgendaStatus,
    sessions: Vec<Session>,
}

impl Agenda {
    /// Create a new pending agenda.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is empty or too long, or description too long
    pub fn new(
        id: AgendaId,
        title: String,
        description: String,
        created_by: UserId,
        now: Timestamp,
    ) -> Result<Self, BallotError> {
        Self::validate_title(&title)?;
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::too_long(
                "description",
                MAX_DESCRIPTION_LENGTH,
                description.chars().count(),
            )
            .into());
        }

        Ok(Self {
            id,
            title: title.trim().to_string(),
            description,
            created_by,
            created_at: now,
            status: AgendaStatus::Pending,
            sessions: Vec::new(),
        })
    }

    /// Reconstitute an agenda from persistence (no validation).
    pub fn reconstitute(
        id: AgendaId,
        title: String,
        description: String,
        created_by: UserId,
        created_at: Timestamp,
        status: AgendaStatus,
        sessions: Vec<Session>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            created_by,
            created_at,
            status,
            sessions,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &AgendaId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn status(&self) -> AgendaStatus {
        self.status
    }

    /// Sessions in creation order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    pub(crate) fn session_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id() == id)
    }

    /// The session currently blocking new ones, if any.
    pub fn active_session(&self, now: &Timestamp) -> Option<&Session> {
        self.sessions.iter().find(|s| s.is_active(now))
    }

    pub fn has_active_session(&self, now: &Timestamp) -> bool {
        self.active_session(now).is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Schedules a new session and appends it.
    ///
    /// # Errors
    ///
    /// - `AgendaAlreadyClosed` if the agenda is closed
    /// - `SessionAlreadyActive` if another session is open and not ended
    /// - `StartTimeNotInFuture` / `InvalidDuration` from [`Session::schedule`]
    pub fn open_session(
        &mut self,
        start_time: Timestamp,
        duration_minutes: i64,
        now: Timestamp,
    ) -> Result<&Session, BallotError> {
        if self.status.is_closed() {
            return Err(BallotError::AgendaAlreadyClosed(self.id));
        }
        if self.has_active_session(&now) {
            return Err(BallotError::SessionAlreadyActive(self.id));
        }

        let session = Session::schedule(self.id, start_time, duration_minutes, now)?;

        if self.status.can_transition_to(&AgendaStatus::Active) {
            self.status = AgendaStatus::Active;
        }
        self.sessions.push(session);
        Ok(&self.sessions[self.sessions.len() - 1])
    }

    /// Closes one session. Returns `false` if it was already closed.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not belong to this agenda
    pub fn close_session(&mut self, session_id: &SessionId) -> Result<bool, BallotError> {
        let session = self
            .session_mut(session_id)
            .ok_or(BallotError::SessionNotFound(*session_id))?;
        Ok(session.close())
    }

    /// Closes the agenda and every session still open.
    ///
    /// Returns the ids of the sessions this call closed.
    ///
    /// # Errors
    ///
    /// - `AgendaAlreadyClosed` if already closed
    pub fn close(&mut self) -> Result<Vec<SessionId>, BallotError> {
        if !self.status.can_transition_to(&AgendaStatus::Closed) {
            return Err(BallotError::AgendaAlreadyClosed(self.id));
        }

        self.status = AgendaStatus::Closed;
        let closed = self
            .sessions
            .iter_mut()
            .filter_map(|s| s.close().then(|| *s.id()))
            .collect();
        Ok(closed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn validate_title(title: &str) -> Result<(), BallotError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("title").into());
        }
        let len = trimmed.chars().count();
        if len > MAX_TITLE_LENGTH {
            return Err(ValidationError::too_long("title", MAX_TITLE_LENGTH, len).into());
        }
        Ok(())
    }
}
