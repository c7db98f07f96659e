//! Rejected suggestion history record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::Suggestion;

/// A suggestion plus the rejection that resolved it.
///
/// Read-only history/analytics record; the backend is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedSuggestion {
    pub suggestion: Suggestion,
    pub reason: String,
    pub is_custom_reason: bool,
    pub rejected_at: Option<Timestamp>,
}

impl RejectedSuggestion {
    pub fn new(
        suggestion: Suggestion,
        reason: impl Into<String>,
        is_custom_reason: bool,
        rejected_at: Option<Timestamp>,
    ) -> Self {
        Self {
            suggestion,
            reason: reason.into(),
            is_custom_reason,
            rejected_at,
        }
    }
}
