//! Engine tuning shared by the command handlers.

use std::time::Duration;

/// Default number of read-validate-write attempts per command.
pub const DEFAULT_MAX_WRITE_ATTEMPTS: u32 = 3;

/// Default bound on one eligibility check.
pub const DEFAULT_ELIGIBILITY_TIMEOUT: Duration = Duration::from_millis(2000);

/// Bounds applied by the command handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Attempts before a lost version-checked write or vote append is
    /// reported to the caller. Closes never retry.
    pub max_write_attempts: u32,
    /// Timeout around each eligibility check.
    pub eligibility_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
            eligibility_timeout: DEFAULT_ELIGIBILITY_TIMEOUT,
        }
    }
}

impl EngineSettings {
    pub fn with_max_write_attempts(mut self, attempts: u32) -> Self {
        self.max_write_attempts = attempts.max(1);
        self
    }

    pub fn with_eligibility_timeout(mut self, timeout: Duration) -> Self {
        self.eligibility_timeout = timeout;
        self
    }
}
