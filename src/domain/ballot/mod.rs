//! Ballot domain module.
//!
//! Agendas own time-boxed sessions; sessions own votes. This module holds
//! the rules: when a session may open, when it admits votes, how it closes,
//! and how its votes are tallied.

mod agenda;
mod errors;
mod session;
mod tally;
mod vote;

pub use agenda::{Agenda, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
pub use errors::BallotError;
pub use session::{Session, SessionPhase, MIN_DURATION_MINUTES};
pub use tally::{tally, VoteResult, Winner};
pub use vote::{Vote, VoteType};
