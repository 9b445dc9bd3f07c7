//! Ballot-specific error types.

use crate::domain::foundation::{AgendaId, ErrorClass, ErrorCode, SessionId, ValidationError};

/// Every outcome the engine can reject an operation with.
///
/// Each variant maps to one [`ErrorCode`], so callers branch on the variant
/// or the code and never on the message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BallotError {
    /// Agenda was not found.
    AgendaNotFound(AgendaId),
    /// Session was not found.
    SessionNotFound(SessionId),
    /// Another session on the agenda is open and has not reached its end time.
    SessionAlreadyActive(AgendaId),
    /// Requested start time is not strictly after now.
    StartTimeNotInFuture,
    /// Duration below one minute.
    InvalidDuration(i64),
    /// Vote attempted before the session window opened.
    SessionNotYetStarted(SessionId),
    /// Vote attempted on a closed session.
    SessionNotOpen(SessionId),
    /// Vote attempted after the session window ended.
    SessionExpired(SessionId),
    /// Final result requested for a session that is still open.
    SessionNotClosed(SessionId),
    /// Agenda is already closed.
    AgendaAlreadyClosed(AgendaId),
    /// The identity already voted in this session.
    DuplicateVote(SessionId),
    /// Eligibility service answered negatively.
    VoterNotEligible,
    /// Eligibility service timed out or failed transiently.
    EligibilityCheckUnavailable(String),
    /// Input failed validation.
    ValidationFailed { field: String, message: String },
    /// Conditional writes kept losing to concurrent writers.
    Contended(String),
    /// Infrastructure error.
    Infrastructure(String),
}

impl BallotError {
    pub fn agenda_not_found(id: AgendaId) -> Self {
        BallotError::AgendaNotFound(id)
    }
    pub fn session_not_found(id: SessionId) -> Self {
        BallotError::SessionNotFound(id)
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BallotError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn eligibility_unavailable(message: impl Into<String>) -> Self {
        BallotError::EligibilityCheckUnavailable(message.into())
    }
    pub fn contended(message: impl Into<String>) -> Self {
        BallotError::Contended(message.into())
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        BallotError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BallotError::AgendaNotFound(_) => ErrorCode::AgendaNotFound,
            BallotError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            BallotError::SessionAlreadyActive(_) => ErrorCode::SessionAlreadyActive,
            BallotError::StartTimeNotInFuture => ErrorCode::StartTimeNotInFuture,
            BallotError::InvalidDuration(_) => ErrorCode::InvalidDuration,
            BallotError::SessionNotYetStarted(_) => ErrorCode::SessionNotYetStarted,
            BallotError::SessionNotOpen(_) => ErrorCode::SessionNotOpen,
            BallotError::SessionExpired(_) => ErrorCode::SessionExpired,
            BallotError::SessionNotClosed(_) => ErrorCode::SessionNotClosed,
            BallotError::AgendaAlreadyClosed(_) => ErrorCode::AgendaAlreadyClosed,
            BallotError::DuplicateVote(_) => ErrorCode::DuplicateVote,
            BallotError::VoterNotEligible => ErrorCode::VoterNotEligible,
            BallotError::EligibilityCheckUnavailable(_) => ErrorCode::EligibilityCheckUnavailable,
            BallotError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            BallotError::Contended(_) => ErrorCode::StoreContention,
            BallotError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn class(&self) -> ErrorClass {
        self.code().class()
    }

    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }

    pub fn message(&self) -> String {
        match self {
            BallotError::AgendaNotFound(id) => format!("Agenda not found: {}", id),
            BallotError::SessionNotFound(id) => format!("Session not found: {}", id),
            BallotError::SessionAlreadyActive(id) => format!(
                "Agenda {} already has an open session that has not ended; close it or wait for it to expire",
                id
            ),
            BallotError::StartTimeNotInFuture => "Start time must be in the future".to_string(),
            BallotError::InvalidDuration(minutes) => format!(
                "Duration must be at least 1 minute, got {}",
                minutes
            ),
            BallotError::SessionNotYetStarted(id) => {
                format!("Session {} has not started yet", id)
            }
            BallotError::SessionNotOpen(id) => format!("Session {} is not open for voting", id),
            BallotError::SessionExpired(id) => format!("Session {} has expired", id),
            BallotError::SessionNotClosed(id) => {
                format!("Session {} has not been closed yet", id)
            }
            BallotError::AgendaAlreadyClosed(id) => format!("Agenda {} is already closed", id),
            BallotError::DuplicateVote(id) => {
                format!("This identity has already voted in session {}", id)
            }
            BallotError::VoterNotEligible => "Voter not found or not eligible".to_string(),
            BallotError::EligibilityCheckUnavailable(msg) => {
                format!("Eligibility check unavailable: {}", msg)
            }
            BallotError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            BallotError::Contended(msg) => format!("Too much concurrent activity: {}", msg),
            BallotError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for BallotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BallotError {}

impl From<ValidationError> for BallotError {
    fn from(err: ValidationError) -> Self {
        BallotError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_a_distinct_code() {
        let session = SessionId::new();
        let agenda = AgendaId::new();
        let errors = vec![
            BallotError::AgendaNotFound(agenda),
            BallotError::SessionNotFound(session),
            BallotError::SessionAlreadyActive(agenda),
            BallotError::StartTimeNotInFuture,
            BallotError::InvalidDuration(0),
            BallotError::SessionNotYetStarted(session),
            BallotError::SessionNotOpen(session),
            BallotError::SessionExpired(session),
            BallotError::SessionNotClosed(session),
            BallotError::AgendaAlreadyClosed(agenda),
            BallotError::DuplicateVote(session),
            BallotError::VoterNotEligible,
            BallotError::eligibility_unavailable("timeout"),
            BallotError::validation("cpf", "bad"),
            BallotError::contended("lost"),
            BallotError::infrastructure("db down"),
        ];

        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn ineligible_and_unavailable_are_distinguishable() {
        let ineligible = BallotError::VoterNotEligible;
        let unavailable = BallotError::eligibility_unavailable("timed out after 2000ms");

        assert_ne!(ineligible.code(), unavailable.code());
        assert!(!ineligible.is_retryable());
        assert!(unavailable.is_retryable());
    }

    #[test]
    fn duplicate_vote_is_conflict_class() {
        assert_eq!(
            BallotError::DuplicateVote(SessionId::new()).class(),
            ErrorClass::Conflict
        );
    }

    #[test]
    fn validation_error_converts_with_field() {
        let err: BallotError = ValidationError::empty_field("title").into();
        match err {
            BallotError::ValidationFailed { field, .. } => assert_eq!(field, "title"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn display_uses_message() {
        let err = BallotError::InvalidDuration(0);
        assert_eq!(err.to_string(), "Duration must be at least 1 minute, got 0");
    }
}
