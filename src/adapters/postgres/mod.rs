//! PostgreSQL adapters - Database implementation of the ballot store port.
//!
//! - `PostgresBallotStore` - Agendas, sessions and votes in three tables,
//!   conditional writes done in row-locking transactions

mod ballot_store;

pub use ballot_store::PostgresBallotStore;
