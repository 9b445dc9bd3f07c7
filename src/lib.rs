//! Ballot Engine - voting sessions and ballot integrity for agendas
//!
//! An agenda collects timed voting sessions. While a session's window is
//! open, eligible voters cast one Yes/No vote each; once it closes the
//! votes are tallied into a result.
//!
//! # Layout
//!
//! - `domain` - Agenda aggregate, sessions, votes, tally
//! - `ports` - Store, clock and eligibility contracts
//! - `adapters` - In-memory and PostgreSQL stores, HTTP eligibility client
//! - `application` - Command handlers and the [`application::BallotEngine`] facade
//! - `config` - Environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
