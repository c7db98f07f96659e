//! FeedbackSink port - records verdicts against suggestions.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProfileId, SuggestionId};
use crate::domain::suggestion::{RejectionFeedback, Verdict};

/// One verdict submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub profile_id: ProfileId,
    pub suggestion_id: SuggestionId,
    pub verdict: Verdict,
    /// Present only for rejections that carry a reason.
    pub rejection: Option<RejectionFeedback>,
}

impl FeedbackRecord {
    pub fn accept(profile_id: ProfileId, suggestion_id: SuggestionId) -> Self {
        Self {
            profile_id,
            suggestion_id,
            verdict: Verdict::Accept,
            rejection: None,
        }
    }

    pub fn reject(
        profile_id: ProfileId,
        suggestion_id: SuggestionId,
        rejection: Option<RejectionFeedback>,
    ) -> Self {
        Self {
            profile_id,
            suggestion_id,
            verdict: Verdict::Reject,
            rejection,
        }
    }
}

/// Port for recording a user verdict server-side.
///
/// Submission resolves the suggestion (pending -> accepted/rejected,
/// exactly once) and appends it to the matching history. The sink performs
/// no local list mutation; history consumers refresh from the backend on
/// the published event instead.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Submits the verdict. A failure must leave the suggestion pending
    /// server-side so the same verdict can be retried.
    async fn submit(&self, record: FeedbackRecord) -> Result<(), DomainError>;
}
