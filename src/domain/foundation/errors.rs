//! Error vocabulary shared by the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be at most {max} characters, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a too-long validation error.
    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    AgendaNotFound,
    SessionNotFound,

    // Business rule errors
    SessionAlreadyActive,
    StartTimeNotInFuture,
    InvalidDuration,
    SessionNotYetStarted,
    SessionNotOpen,
    SessionExpired,
    SessionNotClosed,
    AgendaAlreadyClosed,

    // Conflict errors
    DuplicateVote,

    // Eligibility errors
    VoterNotEligible,
    EligibilityCheckUnavailable,

    // Infrastructure errors
    StoreContention,
    DatabaseError,
}

/// Coarse classification a transport layer maps onto its own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Addressed entity does not exist.
    NotFound,
    /// Client-correctable business rule violation.
    Rejected,
    /// Request collides with existing state.
    Conflict,
    /// Caller may not perform the action.
    Forbidden,
    /// Temporary failure; the same request may succeed later.
    Unavailable,
    /// Unexpected infrastructure failure.
    Internal,
}

impl ErrorCode {
    /// Returns the class of this code.
    pub fn class(&self) -> ErrorClass {
        use ErrorCode::*;
        match self {
            AgendaNotFound | SessionNotFound => ErrorClass::NotFound,
            ValidationFailed | SessionAlreadyActive | StartTimeNotInFuture | InvalidDuration
            | SessionNotYetStarted | SessionNotOpen | SessionExpired | SessionNotClosed
            | AgendaAlreadyClosed => ErrorClass::Rejected,
            DuplicateVote => ErrorClass::Conflict,
            VoterNotEligible => ErrorClass::Forbidden,
            EligibilityCheckUnavailable | StoreContention => ErrorClass::Unavailable,
            DatabaseError => ErrorClass::Internal,
        }
    }

    /// Returns true if repeating the identical request may succeed.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Unavailable
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::AgendaNotFound => "AGENDA_NOT_FOUND",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::SessionAlreadyActive => "SESSION_ALREADY_ACTIVE",
            ErrorCode::StartTimeNotInFuture => "START_TIME_NOT_IN_FUTURE",
            ErrorCode::InvalidDuration => "INVALID_DURATION",
            ErrorCode::SessionNotYetStarted => "SESSION_NOT_YET_STARTED",
            ErrorCode::SessionNotOpen => "SESSION_NOT_OPEN",
            ErrorCode::SessionExpired => "SESSION_EXPIRED",
            ErrorCode::SessionNotClosed => "SESSION_NOT_CLOSED",
            ErrorCode::AgendaAlreadyClosed => "AGENDA_ALREADY_CLOSED",
            ErrorCode::DuplicateVote => "DUPLICATE_VOTE",
            ErrorCode::VoterNotEligible => "VOTER_NOT_ELIGIBLE",
            ErrorCode::EligibilityCheckUnavailable => "ELIGIBILITY_CHECK_UNAVAILABLE",
            ErrorCode::StoreContention => "STORE_CONTENTION",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
        };
        write!(f, "{}", s)
    }
}
