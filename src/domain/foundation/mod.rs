//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the ballot domain.

mod agenda_status;
mod cpf;
mod errors;
mod ids;
mod session_status;
mod state_machine;
mod timestamp;

pub use agenda_status::AgendaStatus;
pub use cpf::{Cpf, CPF_LENGTH};
pub use errors::{ErrorClass, ErrorCode, ValidationError};
pub use ids::{AgendaId, SessionId, UserId};
pub use session_status::SessionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
