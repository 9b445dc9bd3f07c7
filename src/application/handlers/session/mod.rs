//! Session command and query handlers.

mod close_session;
mod get_session;
mod list_active_sessions;
mod open_session;

pub use close_session::{CloseSessionCommand, CloseSessionHandler};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use list_active_sessions::{ListActiveSessionsHandler, ListActiveSessionsQuery};
pub use open_session::{OpenSessionCommand, OpenSessionHandler};
