//! Session-level error taxonomy.

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

use super::SessionPhase;

/// Errors surfaced by session state machine transitions.
///
/// The taxonomy distinguishes outcomes the caller must treat differently:
/// `Gate` blocks everything until the credential is fixed, `QueueExhausted`
/// is terminal for one queue key but user-recoverable, `Transient` failures
/// on feedback preserve the current suggestion for retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Credential gate failure; no other operation may proceed.
    Gate(String),
    /// Queue empty even after the single refill attempt.
    QueueExhausted,
    /// Network or validation failure of a single request.
    Transient(String),
    /// Operation not valid in the current phase.
    InvalidPhase { operation: &'static str, phase: SessionPhase },
    /// No pending suggestion to act on.
    NoCurrentSuggestion,
    /// Client-side field validation failure.
    Validation { field: String, message: String },
}

impl SessionError {
    pub fn gate(message: impl Into<String>) -> Self {
        SessionError::Gate(message.into())
    }

    pub fn transient(message: impl Into<String>) -> Self {
        SessionError::Transient(message.into())
    }

    pub fn invalid_phase(operation: &'static str, phase: SessionPhase) -> Self {
        SessionError::InvalidPhase { operation, phase }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Gate(_) => ErrorCode::Unauthorized,
            SessionError::QueueExhausted => ErrorCode::QueueExhausted,
            SessionError::Transient(_) => ErrorCode::NetworkError,
            SessionError::InvalidPhase { .. } => ErrorCode::InvalidStateTransition,
            SessionError::NoCurrentSuggestion => ErrorCode::SuggestionNotFound,
            SessionError::Validation { .. } => ErrorCode::ValidationFailed,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SessionError::Gate(msg) => msg.clone(),
            SessionError::QueueExhausted => "No more suggestions available".to_string(),
            SessionError::Transient(msg) => msg.clone(),
            SessionError::InvalidPhase { operation, phase } => {
                format!("Cannot {} in phase {:?}", operation, phase)
            }
            SessionError::NoCurrentSuggestion => "No suggestion is pending".to_string(),
            SessionError::Validation { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
        }
    }

    /// Whether the session keeps its current suggestion so the same
    /// action can be retried without re-fetching.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::Transient(_) | SessionError::Gate(_) | SessionError::NoCurrentSuggestion
        )
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Unauthorized => SessionError::Gate(err.message),
            ErrorCode::QueueExhausted => SessionError::QueueExhausted,
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => SessionError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => SessionError::Transient(err.message),
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field } => field.clone(),
            ValidationError::OutOfRange { field, .. } => field.clone(),
            ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        SessionError::Validation {
            field,
            message: err.to_string(),
        }
    }
}
