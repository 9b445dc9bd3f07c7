//! Clock port - source of the current instant.
//!
//! Every time-dependent rule (session windows, expiry, vote timestamps) reads
//! the time through this port so tests can pin and advance it.

use crate::domain::foundation::Timestamp;

/// Port for reading the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Timestamp;
}
