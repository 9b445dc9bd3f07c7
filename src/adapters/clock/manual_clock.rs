//! Manually driven clock.
//!
//! Clones share the same instant, so a test can hand one clone to the engine
//! and move time forward through another.

use std::sync::{Arc, Mutex};

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Clock whose time only changes when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, at: Timestamp) {
        *self.lock() = at;
    }

    /// Move forward by whole minutes.
    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.lock();
        *now = now.plus_minutes(minutes);
    }

    /// Move forward by seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.lock();
        *now = now.plus_secs(secs);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Timestamp> {
        // A poisoned lock still holds a valid Timestamp.
        self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.lock()
    }
}
