//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers perform conditional writes with bounded retry; query
//! handlers only read.

mod engine;
pub mod handlers;
mod settings;
mod store_errors;

pub use engine::BallotEngine;
pub use settings::{EngineSettings, DEFAULT_ELIGIBILITY_TIMEOUT, DEFAULT_MAX_WRITE_ATTEMPTS};
