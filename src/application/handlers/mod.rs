//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod agenda;
pub mod session;
pub mod vote;

#[cfg(test)]
pub(crate) mod test_support;

pub use agenda::{
    CloseAgendaCommand, CloseAgendaHandler, CloseAgendaResult, CreateAgendaCommand,
    CreateAgendaHandler, FindAgendaBySessionQuery, GetAgendaHandler, GetAgendaQuery,
    ListAgendasHandler, ListAgendasQuery,
};
pub use session::{
    CloseSessionCommand, CloseSessionHandler, GetSessionHandler, GetSessionQuery,
    ListActiveSessionsHandler, ListActiveSessionsQuery, OpenSessionCommand, OpenSessionHandler,
};
pub use vote::{
    RegisterVoteCommand, RegisterVoteHandler, SessionResultQuery, TallySessionHandler,
    TallySessionQuery,
};
