//! Mapping from store failures to engine errors.
//!
//! Handlers that retry intercept `Conflict` and `PreconditionFailed` first;
//! whatever reaches this conversion is final.

use crate::domain::ballot::BallotError;
use crate::ports::StoreError;

impl From<StoreError> for BallotError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AgendaNotFound(id) => BallotError::AgendaNotFound(id),
            StoreError::SessionNotFound(id) => BallotError::SessionNotFound(id),
            StoreError::DuplicateVote(id) => BallotError::DuplicateVote(id),
            StoreError::AgendaClosed(id) => BallotError::AgendaAlreadyClosed(id),
            StoreError::Conflict(id) => {
                BallotError::contended(format!("Concurrent update on agenda {}", id))
            }
            StoreError::PreconditionFailed(msg) => BallotError::contended(msg),
            StoreError::AlreadyExists(id) => {
                BallotError::infrastructure(format!("Agenda id collision: {}", id))
            }
            StoreError::Database(msg) => BallotError::infrastructure(msg),
        }
    }
}
