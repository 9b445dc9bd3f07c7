//! Engine configuration (write retry bound)

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::DEFAULT_MAX_WRITE_ATTEMPTS;

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Read-validate-write attempts before a lost race is reported
    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: u32,
}

impl EngineConfig {
    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=10).contains(&self.max_write_attempts) {
            return Err(ValidationError::InvalidWriteAttempts(self.max_write_attempts));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_write_attempts: default_max_write_attempts(),
        }
    }
}

fn default_max_write_attempts() -> u32 {
    DEFAULT_MAX_WRITE_ATTEMPTS
}
