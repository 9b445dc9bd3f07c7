//! RegisterVoteHandler - Command handler for casting a vote.
//!
//! Order of checks:
//! 1. input parsing (cpf, user id)
//! 2. eligibility, bounded by a timeout
//! 3. fresh read of the session and its admission window
//! 4. one vote per cpf
//! 5. conditional append, re-checking 3 and 4 at write time
//!
//! A lost append re-runs 3-5 so the caller gets the specific reason
//! (`DuplicateVote`, `SessionExpired`, ...) rather than a bare conflict.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ballot::{BallotError, Vote, VoteType};
use crate::domain::foundation::{Cpf, SessionId, UserId};
use crate::ports::{BallotStore, Clock, Eligibility, EligibilityChecker, StoreError};

/// Command to cast a vote.
#[derive(Debug, Clone)]
pub struct RegisterVoteCommand {
    pub session_id: SessionId,
    pub user_id: String,
    /// Raw identity; `.` and `-` are stripped.
    pub cpf: String,
    pub vote_type: VoteType,
}

/// Handler for casting votes.
pub struct RegisterVoteHandler {
    store: Arc<dyn BallotStore>,
    clock: Arc<dyn Clock>,
    eligibility: Arc<dyn EligibilityChecker>,
    eligibility_timeout: Duration,
    max_attempts: u32,
}

impl RegisterVoteHandler {
    pub fn new(
        store: Arc<dyn BallotStore>,
        clock: Arc<dyn Clock>,
        eligibility: Arc<dyn EligibilityChecker>,
        eligibility_timeout: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            clock,
            eligibility,
            eligibility_timeout,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn handle(&self, cmd: RegisterVoteCommand) -> Result<Vote, BallotError> {
        let cpf = Cpf::parse(&cmd.cpf)?;
        let user_id = UserId::new(cmd.user_id)?;

        self.ensure_eligible(&cpf, &cmd.session_id).await?;

        for attempt in 1..=self.max_attempts {
            let current = self
                .store
                .find_agenda_by_session(&cmd.session_id)
                .await?
                .ok_or(BallotError::SessionNotFound(cmd.session_id))?;
            let session = current
                .agenda
                .session(&cmd.session_id)
                .ok_or(BallotError::SessionNotFound(cmd.session_id))?;

            let now = self.clock.now();
            if let Err(e) = session.ensure_accepts_votes(&now) {
                tracing::warn!(session_id = %cmd.session_id, code = %e.code(), "Vote rejected");
                return Err(e);
            }
            if session.has_vote_from(&cpf) {
                tracing::warn!(session_id = %cmd.session_id, cpf_masked = %cpf.masked(), "Duplicate vote rejected");
                return Err(BallotError::DuplicateVote(cmd.session_id));
            }

            let vote = Vote::new(user_id.clone(), cpf.clone(), cmd.vote_type, now);
            match self.store.append_vote(&cmd.session_id, &vote).await {
                Ok(()) => {
                    tracing::info!(
                        session_id = %cmd.session_id,
                        cpf_masked = %cpf.masked(),
                        vote_type = %vote.vote_type(),
                        "Vote registered"
                    );
                    return Ok(vote);
                }
                Err(StoreError::DuplicateVote(_)) => {
                    tracing::warn!(session_id = %cmd.session_id, cpf_masked = %cpf.masked(), "Duplicate vote lost the race");
                    return Err(BallotError::DuplicateVote(cmd.session_id));
                }
                Err(StoreError::PreconditionFailed(reason)) => {
                    tracing::warn!(session_id = %cmd.session_id, attempt, %reason, "Vote append lost a race, retrying");
                }
                Err(StoreError::Conflict(_)) => {
                    tracing::warn!(session_id = %cmd.session_id, attempt, "Vote append lost a race, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(BallotError::contended(format!(
            "Session {} kept changing while voting",
            cmd.session_id
        )))
    }

    async fn ensure_eligible(&self, cpf: &Cpf, session_id: &SessionId) -> Result<(), BallotError> {
        let outcome = tokio::time::timeout(self.eligibility_timeout, self.eligibility.check(cpf)).await;

        match outcome {
            Ok(Eligibility::Eligible) => Ok(()),
            Ok(Eligibility::Ineligible) => {
                tracing::warn!(session_id = %session_id, cpf_masked = %cpf.masked(), "Voter not eligible");
                Err(BallotError::VoterNotEligible)
            }
            Ok(Eligibility::TransientFailure(reason)) => {
                tracing::warn!(session_id = %session_id, %reason, "Eligibility check failed");
                Err(BallotError::eligibility_unavailable(reason))
            }
            Err(_) => {
                tracing::warn!(
                    session_id = %session_id,
                    timeout_ms = self.eligibility_timeout.as_millis() as u64,
                    "Eligibility check timed out"
                );
                Err(BallotError::eligibility_unavailable(format!(
                    "no answer within {} ms",
                    self.eligibility_timeout.as_millis()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::ManualClock;
    use crate::adapters::eligibility::StubEligibilityChecker;
    use crate::adapters::storage::InMemoryBallotStore;
    use crate::application::handlers::test_support::{seed_session, t0, RacingStore};
    use crate::domain::foundation::{ErrorCode, Timestamp};

    struct Fixture {
        store: InMemoryBallotStore,
        clock: Arc<ManualClock>,
        session_id: SessionId,
    }

    async fn fixture(now: Timestamp) -> Fixture {
        let store = InMemoryBallotStore::new();
        let (_, session_id) = seed_session(&store).await;
        Fixture {
            store,
            clock: Arc::new(ManualClock::new(now)),
            session_id,
        }
    }

    fn handler_with(
        store: Arc<dyn BallotStore>,
        clock: Arc<ManualClock>,
        checker: StubEligibilityChecker,
    ) -> RegisterVoteHandler {
        RegisterVoteHandler::new(store, clock, Arc::new(checker), Duration::from_millis(200), 3)
    }

    fn command(session_id: SessionId, cpf: &str, vote_type: VoteType) -> RegisterVoteCommand {
        RegisterVoteCommand {
            session_id,
            user_id: "voter".to_string(),
            cpf: cpf.to_string(),
            vote_type,
        }
    }

    #[tokio::test]
    async fn registers_vote_in_progress() {
        let f = fixture(t0().plus_minutes(1)).await;
        let handler = handler_with(Arc::new(f.store.clone()), f.clock.clone(), StubEligibilityChecker::new());

        let vote = handler
            .handle(command(f.session_id, "123.456.789-09", VoteType::Yes))
            .await
            .unwrap();

        assert_eq!(vote.cast_at(), &t0().plus_minutes(1));
        assert_eq!(vote.cpf().as_str(), "12345678909");
        let stored = f.store.find_agenda_by_session(&f.session_id).await.unwrap().unwrap();
        assert_eq!(stored.agenda.session(&f.session_id).unwrap().vote_count(), 1);
    }

    #[tokio::test]
    async fn rejects_second_vote_from_same_cpf() {
        let f = fixture(t0().plus_minutes(1)).await;
        let handler = handler_with(Arc::new(f.store.clone()), f.clock.clone(), StubEligibilityChecker::new());

        handler
            .handle(command(f.session_id, "12345678909", VoteType::Yes))
            .await
            .unwrap();
        let err = handler
            .handle(command(f.session_id, "12345678909", VoteType::No))
            .await
            .unwrap_err();

        assert_eq!(err, BallotError::DuplicateVote(f.session_id));
    }

    #[tokio::test]
    async fn window_errors_follow_the_clock() {
        let f = fixture(t0().plus_secs(-1)).await;
        let handler = handler_with(Arc::new(f.store.clone()), f.clock.clone(), StubEligibilityChecker::new());

        assert_eq!(
            handler.handle(command(f.session_id, "11111111111", VoteType::Yes)).await,
            Err(BallotError::SessionNotYetStarted(f.session_id))
        );

        f.clock.set(t0().plus_minutes(10));
        assert_eq!(
            handler.handle(command(f.session_id, "11111111111", VoteType::Yes)).await,
            Err(BallotError::SessionExpired(f.session_id))
        );
    }

    #[tokio::test]
    async fn closed_session_is_not_open() {
        let f = fixture(t0().plus_minutes(1)).await;
        let mut current = f.store.find_agenda_by_session(&f.session_id).await.unwrap().unwrap();
        current.agenda.close_session(&f.session_id).unwrap();
        f.store.replace_agenda(&current.agenda, current.version).await.unwrap();
        let handler = handler_with(Arc::new(f.store.clone()), f.clock.clone(), StubEligibilityChecker::new());

        assert_eq!(
            handler.handle(command(f.session_id, "11111111111", VoteType::Yes)).await,
            Err(BallotError::SessionNotOpen(f.session_id))
        );
    }

    #[tokio::test]
    async fn ineligible_voter_is_rejected_before_reading_session() {
        let f = fixture(t0().plus_minutes(1)).await;
        let checker = StubEligibilityChecker::new().deny("11111111111");
        let handler = handler_with(Arc::new(f.store.clone()), f.clock.clone(), checker);

        let missing = SessionId::new();
        assert_eq!(
            handler.handle(command(missing, "11111111111", VoteType::Yes)).await,
            Err(BallotError::VoterNotEligible)
        );
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let f = fixture(t0().plus_minutes(1)).await;
        let handler = handler_with(Arc::new(f.store.clone()), f.clock.clone(), StubEligibilityChecker::new());

        let missing = SessionId::new();
        assert_eq!(
            handler.handle(command(missing, "11111111111", VoteType::Yes)).await,
            Err(BallotError::SessionNotFound(missing))
        );
    }

    #[tokio::test]
    async fn failing_checker_is_unavailable() {
        let f = fixture(t0().plus_minutes(1)).await;
        let handler = handler_with(
            Arc::new(f.store.clone()),
            f.clock.clone(),
            StubEligibilityChecker::failing("down"),
        );

        let err = handler
            .handle(command(f.session_id, "11111111111", VoteType::Yes))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::EligibilityCheckUnavailable);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn slow_checker_times_out_without_writing() {
        let f = fixture(t0().plus_minutes(1)).await;
        let handler = handler_with(
            Arc::new(f.store.clone()),
            f.clock.clone(),
            StubEligibilityChecker::new().with_delay(Duration::from_secs(5)),
        );

        let err = handler
            .handle(command(f.session_id, "11111111111", VoteType::Yes))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::EligibilityCheckUnavailable);
        let stored = f.store.find_agenda_by_session(&f.session_id).await.unwrap().unwrap();
        assert_eq!(stored.agenda.session(&f.session_id).unwrap().vote_count(), 0);
    }

    #[tokio::test]
    async fn malformed_cpf_is_validation_error() {
        let f = fixture(t0().plus_minutes(1)).await;
        let checker = StubEligibilityChecker::new();
        let handler = handler_with(Arc::new(f.store.clone()), f.clock.clone(), checker.clone());

        let err = handler
            .handle(command(f.session_id, "123", VoteType::Yes))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(checker.call_count(), 0);
    }

    #[tokio::test]
    async fn retries_lost_append() {
        let f = fixture(t0().plus_minutes(1)).await;
        let store = Arc::new(RacingStore::new(f.store.clone(), 1));
        let handler = handler_with(store, f.clock.clone(), StubEligibilityChecker::new());

        assert!(handler
            .handle(command(f.session_id, "11111111111", VoteType::No))
            .await
            .is_ok());
    }
}
