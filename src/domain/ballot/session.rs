//! Voting session entity.
//!
//! A session is a time-boxed voting window owned by an agenda. Only the
//! explicit close is persisted; "not started yet" and "expired" are derived
//! from the clock every time they are asked for.

use serde::{Deserialize, Serialize};

use super::{tally, BallotError, Vote, VoteResult};
use crate::domain::foundation::{AgendaId, Cpf, SessionId, SessionStatus, StateMachine, Timestamp};

/// Minimum session duration in minutes.
pub const MIN_DURATION_MINUTES: i64 = 1;

/// Where a session stands relative to a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Open, start time not reached.
    Scheduled,
    /// Open and inside its window; votes are admissible.
    InProgress,
    /// Open but past its end time.
    Expired,
    /// Explicitly closed.
    Closed,
}

/// Voting session.
///
/// # Invariants
///
/// - `end_time` > `start_time`
/// - no two votes share a cpf
/// - `Closed` never reverts to `Open`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    agenda_id: AgendaId,
    start_time: Timestamp,
    end_time: Timestamp,
    status: SessionStatus,
    votes: Vec<Vote>,
}

impl Session {
    /// Schedules a new open session.
    ///
    /// # Errors
    ///
    /// - `StartTimeNotInFuture` if `start_time` is not strictly after `now`
    /// - `InvalidDuration` if `duration_minutes` is below one, or the end
    ///   time it yields is not representable
    pub fn schedule(
        agenda_id: AgendaId,
        start_time: Timestamp,
        duration_minutes: i64,
        now: Timestamp,
    ) -> Result<Self, BallotError> {
        if !start_time.is_after(&now) {
            return Err(BallotError::StartTimeNotInFuture);
        }
        if duration_minutes < MIN_DURATION_MINUTES {
            return Err(BallotError::InvalidDuration(duration_minutes));
        }
        let end_time = start_time
            .checked_plus_minutes(duration_minutes)
            .ok_or(BallotError::InvalidDuration(duration_minutes))?;

        Ok(Self {
            id: SessionId::new(),
            agenda_id,
            start_time,
            end_time,
            status: SessionStatus::Open,
            votes: Vec::new(),
        })
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(
        id: SessionId,
        agenda_id: AgendaId,
        start_time: Timestamp,
        end_time: Timestamp,
        status: SessionStatus,
        votes: Vec<Vote>,
    ) -> Self {
        Self {
            id,
            agenda_id,
            start_time,
            end_time,
            status,
            votes,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn agenda_id(&self) -> &AgendaId {
        &self.agenda_id
    }

    pub fn start_time(&self) -> &Timestamp {
        &self.start_time
    }

    pub fn end_time(&self) -> &Timestamp {
        &self.end_time
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Votes in acceptance order.
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Time-derived state
    // ─────────────────────────────────────────────────────────────────────────

    /// Open and not yet ended. Future-scheduled sessions count.
    pub fn is_active(&self, now: &Timestamp) -> bool {
        self.status.is_open() && now.is_before(&self.end_time)
    }

    /// Open and `start_time <= now < end_time`.
    pub fn is_in_progress(&self, now: &Timestamp) -> bool {
        self.phase(now) == SessionPhase::InProgress
    }

    pub fn phase(&self, now: &Timestamp) -> SessionPhase {
        if !self.status.is_open() {
            SessionPhase::Closed
        } else if now.is_before(&self.start_time) {
            SessionPhase::Scheduled
        } else if now.is_before(&self.end_time) {
            SessionPhase::InProgress
        } else {
            SessionPhase::Expired
        }
    }

    /// Checks the session admits votes at `now`.
    ///
    /// The not-started check comes first so that a pre-empted session that
    /// never opened still reports `SessionNotYetStarted`.
    pub fn ensure_accepts_votes(&self, now: &Timestamp) -> Result<(), BallotError> {
        if now.is_before(&self.start_time) {
            return Err(BallotError::SessionNotYetStarted(self.id));
        }
        if !self.status.is_open() {
            return Err(BallotError::SessionNotOpen(self.id));
        }
        if !now.is_before(&self.end_time) {
            return Err(BallotError::SessionExpired(self.id));
        }
        Ok(())
    }

    pub fn has_vote_from(&self, cpf: &Cpf) -> bool {
        self.votes.iter().any(|v| v.cpf() == cpf)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a vote after re-checking the window at the vote's own
    /// timestamp and the one-vote-per-cpf rule.
    ///
    /// # Errors
    ///
    /// - the admissibility errors of [`Session::ensure_accepts_votes`]
    /// - `DuplicateVote` if the cpf already voted
    pub fn accept_vote(&mut self, vote: Vote) -> Result<(), BallotError> {
        self.ensure_accepts_votes(vote.cast_at())?;
        if self.has_vote_from(vote.cpf()) {
            return Err(BallotError::DuplicateVote(self.id));
        }
        self.votes.push(vote);
        Ok(())
    }

    /// Closes the session. Returns `false` if it was already closed.
    pub fn close(&mut self) -> bool {
        if !self.status.can_transition_to(&SessionStatus::Closed) {
            return false;
        }
        self.status = SessionStatus::Closed;
        true
    }

    /// Tallies the votes recorded so far.
    pub fn tally(&self) -> VoteResult {
        tally(&self.votes)
    }
}
