//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `ballot` - Agenda aggregate, sessions, votes and the tally

pub mod ballot;
pub mod foundation;
