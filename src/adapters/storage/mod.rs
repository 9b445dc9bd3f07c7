//! Storage Adapters
//!
//! In-process implementation of the `BallotStore` port. State lives behind a
//! single lock, so every conditional write is atomic with respect to others.
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryBallotStore;
//!
//! let store = Arc::new(InMemoryBallotStore::new());
//! ```

mod in_memory_ballot_store;

pub use in_memory_ballot_store::InMemoryBallotStore;
