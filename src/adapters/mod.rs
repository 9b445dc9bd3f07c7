//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to external systems:
//! - `clock` - System and manually driven clocks
//! - `eligibility` - HTTP eligibility client and a configurable stub
//! - `postgres` - PostgreSQL ballot store
//! - `storage` - In-memory ballot store (tests, development)

pub mod clock;
pub mod eligibility;
pub mod postgres;
pub mod storage;

pub use clock::{ManualClock, SystemClock};
pub use eligibility::{HttpEligibilityChecker, HttpEligibilityConfig, StubEligibilityChecker};
pub use postgres::PostgresBallotStore;
pub use storage::InMemoryBallotStore;
