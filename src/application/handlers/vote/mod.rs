//! Vote command and tally query handlers.

mod register_vote;
mod tally_session;

pub use register_vote::{RegisterVoteCommand, RegisterVoteHandler};
pub use tally_session::{SessionResultQuery, TallySessionHandler, TallySessionQuery};
