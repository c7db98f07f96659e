//! Verdicts and rejection feedback.

use serde::{Deserialize, Serialize};

/// The user's accept/reject decision on a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Accept,
    Reject,
}

/// Reason attached to a rejection.
///
/// Either one of the suggestion's canned reasons or a free-text custom one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionFeedback {
    pub reason: String,
    pub is_custom_reason: bool,
}

impl RejectionFeedback {
    /// Picks one of the canned reasons offered by the suggestion.
    pub fn canned(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            is_custom_reason: false,
        }
    }

    /// Free-text escape hatch.
    pub fn custom(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            is_custom_reason: true,
        }
    }
}
