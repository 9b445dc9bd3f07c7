//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `Clock` - Current time, injected so tests control it
//! - `EligibilityChecker` - Voter eligibility lookups
//! - `BallotStore` - Agenda aggregate persistence with conditional writes

mod ballot_store;
mod clock;
mod eligibility_checker;

pub use ballot_store::{
    AgendaPage, BallotStore, ClosedAgenda, ListOptions, StoreError, VersionedAgenda,
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use clock::Clock;
pub use eligibility_checker::{Eligibility, EligibilityChecker};
