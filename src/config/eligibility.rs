//! Eligibility service configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::telemetry::Environment;

/// Eligibility service configuration
///
/// Without a `base_url` the binary falls back to a permissive stub.
#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityConfig {
    /// Base URL of the eligibility service
    pub base_url: Option<String>,

    /// Bearer token for the service
    pub api_key: Option<Secret<String>>,

    /// Bound on each eligibility check in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl EligibilityConfig {
    /// Get the check timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Exposes the API key (for building the client)
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }

    /// Validate eligibility configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 || self.timeout_ms > 30_000 {
            return Err(ValidationError::InvalidEligibilityTimeout(self.timeout_ms));
        }
        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidEligibilityUrl);
            }
            if *environment == Environment::Production && !url.starts_with("https://") {
                return Err(ValidationError::EligibilityUrlMustBeHttps);
            }
        }
        Ok(())
    }
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    2000
}
