//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `BALLOT_ENGINE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use ballot_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod eligibility;
mod engine;
mod error;
mod telemetry;

pub use database::DatabaseConfig;
pub use eligibility::EligibilityConfig;
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use telemetry::{Environment, TelemetryConfig};

use serde::Deserialize;

use crate::application::EngineSettings;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// in-memory development setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Environment and log filter
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Engine tuning (write retries)
    #[serde(default)]
    pub engine: EngineConfig,

    /// Eligibility service
    #[serde(default)]
    pub eligibility: EligibilityConfig,

    /// PostgreSQL store; in-memory store when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `BALLOT_ENGINE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `BALLOT_ENGINE__ENGINE__MAX_WRITE_ATTEMPTS=5` -> `engine.max_write_attempts = 5`
    /// - `BALLOT_ENGINE__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BALLOT_ENGINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.telemetry.validate()?;
        self.engine.validate()?;
        self.eligibility.validate(&self.telemetry.environment)?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.telemetry.is_production()
    }

    /// Handler bounds derived from this configuration
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings::default()
            .with_max_write_attempts(self.engine.max_write_attempts)
            .with_eligibility_timeout(self.eligibility.timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "BALLOT_ENGINE__TELEMETRY__ENVIRONMENT",
        "BALLOT_ENGINE__ENGINE__MAX_WRITE_ATTEMPTS",
        "BALLOT_ENGINE__ELIGIBILITY__TIMEOUT_MS",
        "BALLOT_ENGINE__ELIGIBILITY__BASE_URL",
        "BALLOT_ENGINE__DATABASE__URL",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.engine.max_write_attempts, 3);
        assert_eq!(config.eligibility.timeout_ms, 2000);
        assert!(config.database.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("BALLOT_ENGINE__ENGINE__MAX_WRITE_ATTEMPTS", "5");
        env::set_var("BALLOT_ENGINE__ELIGIBILITY__TIMEOUT_MS", "750");
        env::set_var("BALLOT_ENGINE__ELIGIBILITY__BASE_URL", "http://localhost:8081");
        env::set_var("BALLOT_ENGINE__DATABASE__URL", "postgresql://test@localhost/ballots");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.engine.max_write_attempts, 5);
        assert_eq!(
            config.eligibility.base_url.as_deref(),
            Some("http://localhost:8081")
        );
        assert_eq!(
            config.database.as_ref().map(|d| d.url.as_str()),
            Some("postgresql://test@localhost/ballots")
        );

        let settings = config.engine_settings();
        assert_eq!(settings.max_write_attempts, 5);
        assert_eq!(settings.eligibility_timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("BALLOT_ENGINE__TELEMETRY__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_validate_rejects_out_of_range_attempts() {
        let config = AppConfig {
            engine: EngineConfig {
                max_write_attempts: 0,
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidWriteAttempts(0))
        );
    }

    #[test]
    fn test_validate_checks_database_when_present() {
        let config = AppConfig {
            database: Some(DatabaseConfig::default()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
