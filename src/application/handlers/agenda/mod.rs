//! Agenda command and query handlers.

mod close_agenda;
mod create_agenda;
mod get_agenda;
mod list_agendas;

pub use close_agenda::{CloseAgendaCommand, CloseAgendaHandler, CloseAgendaResult};
pub use create_agenda::{CreateAgendaCommand, CreateAgendaHandler};
pub use get_agenda::{FindAgendaBySessionQuery, GetAgendaHandler, GetAgendaQuery};
pub use list_agendas::{ListAgendasHandler, ListAgendasQuery};
