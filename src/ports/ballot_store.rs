//! Ballot store port.
//!
//! Persistence for the Agenda aggregate with its sessions and votes nested
//! inside. Every write checks its precondition atomically with the write:
//!
//! - [`BallotStore::replace_agenda`] succeeds only if the stored version still
//!   equals the version the caller read.
//! - [`BallotStore::append_vote`] succeeds only if, at write time, the session
//!   is open, the vote falls inside its window and no vote with the same cpf
//!   exists.
//! - [`BallotStore::close_session`] and [`BallotStore::close_agenda`] change
//!   status only and check it against the stored state, not a version, so
//!   concurrent votes never make them fail.
//!
//! All of them bump the agenda version, so a replace built from a stale read
//! can never overwrite a vote or a close applied in between.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::ballot::{Agenda, Session, Vote};
use crate::domain::foundation::{AgendaId, SessionId};

/// Default page size for agenda listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Errors returned by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Agenda not found: {0}")]
    AgendaNotFound(AgendaId),

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Agenda already exists: {0}")]
    AlreadyExists(AgendaId),

    /// The agenda is closed and cannot be closed again.
    #[error("Agenda already closed: {0}")]
    AgendaClosed(AgendaId),

    /// The version-guarded replace lost a race.
    #[error("Version conflict on agenda {0}")]
    Conflict(AgendaId),

    /// A vote with the same cpf is already recorded for the session.
    #[error("Duplicate vote in session {0}")]
    DuplicateVote(SessionId),

    /// The vote append guard (session open, inside window) failed at write time.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// An agenda together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedAgenda {
    pub agenda: Agenda,
    pub version: u64,
}

/// Outcome of [`BallotStore::close_agenda`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedAgenda {
    /// The agenda as stored after the close.
    pub agenda: Agenda,
    /// Sessions that were open and got closed.
    pub closed_sessions: Vec<SessionId>,
}

/// Options for listing agendas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Maximum number of results to return.
    pub limit: Option<u32>,

    /// Number of results to skip.
    pub offset: Option<u32>,
}

impl ListOptions {
    /// Create options for a paginated query (pages start at 1).
    pub fn paginated(page: u32, per_page: u32) -> Self {
        Self {
            limit: Some(per_page),
            offset: Some(page.saturating_sub(1).saturating_mul(per_page)),
        }
    }

    /// Limit after defaulting and clamping to `1..=MAX_PAGE_LIMIT`.
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn effective_offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

/// A page of agendas ordered by creation time, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaPage {
    pub items: Vec<Agenda>,
    pub total: u64,
    pub has_more: bool,
}

impl AgendaPage {
    pub fn new(items: Vec<Agenda>, total: u64, options: &ListOptions) -> Self {
        let has_more = u64::from(options.effective_offset()) + (items.len() as u64) < total;
        Self {
            items,
            total,
            has_more,
        }
    }
}

/// Store port for the Agenda aggregate.
#[async_trait]
pub trait BallotStore: Send + Sync {
    /// Persist a newly created agenda at version 1.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if an agenda with that id is stored
    async fn insert_agenda(&self, agenda: &Agenda) -> Result<(), StoreError>;

    /// Find an agenda by id.
    async fn find_agenda(&self, id: &AgendaId) -> Result<Option<VersionedAgenda>, StoreError>;

    /// Find the agenda owning a session.
    async fn find_agenda_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<VersionedAgenda>, StoreError>;

    /// List agendas ordered by `created_at` ascending.
    async fn list_agendas(&self, options: &ListOptions) -> Result<AgendaPage, StoreError>;

    /// Agendas with at least one session whose status is open.
    async fn find_agendas_with_open_sessions(&self) -> Result<Vec<Agenda>, StoreError>;

    /// Replace the agenda if its stored version equals `expected_version`.
    ///
    /// Returns the new version.
    ///
    /// # Errors
    ///
    /// - `AgendaNotFound` if the agenda is not stored
    /// - `Conflict` if the stored version moved on
    async fn replace_agenda(&self, agenda: &Agenda, expected_version: u64)
        -> Result<u64, StoreError>;

    /// Append a vote to a session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if no agenda owns the session
    /// - `DuplicateVote` if the cpf already voted in the session
    /// - `PreconditionFailed` if the session is closed or `vote.cast_at()`
    ///   is outside its window
    async fn append_vote(&self, session_id: &SessionId, vote: &Vote) -> Result<(), StoreError>;

    /// Close a session and return it as stored afterwards.
    ///
    /// Closing a closed session changes nothing and returns it unchanged.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if no agenda owns the session
    async fn close_session(&self, session_id: &SessionId) -> Result<Session, StoreError>;

    /// Close an agenda and every session still open, in one write.
    ///
    /// # Errors
    ///
    /// - `AgendaNotFound` if the agenda is not stored
    /// - `AgendaClosed` if it is already closed
    async fn close_agenda(&self, agenda_id: &AgendaId) -> Result<ClosedAgenda, StoreError>;
}
