//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid log filter directive: {0}")]
    InvalidLogLevel(String),

    #[error("max_write_attempts must be between 1 and 10, got {0}")]
    InvalidWriteAttempts(u32),

    #[error("Eligibility timeout must be between 1 and 30000 ms, got {0}")]
    InvalidEligibilityTimeout(u64),

    #[error("Invalid eligibility service URL")]
    InvalidEligibilityUrl,

    #[error("Eligibility service must use HTTPS in production")]
    EligibilityUrlMustBeHttps,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,
}
