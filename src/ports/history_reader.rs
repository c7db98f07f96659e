//! HistoryReader port - read-only accepted/rejected projections.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::suggestion::{RejectedSuggestion, Suggestion};

/// Port for the backend's history endpoints.
///
/// Reads are idempotent pure projections: safe to race with the main
/// queue/feedback flow, last response wins. Ordering is typically
/// chronological but not load-bearing.
#[async_trait]
pub trait HistoryReader: Send + Sync {
    /// All suggestions the profile has accepted.
    async fn accepted(&self, profile_id: &ProfileId) -> Result<Vec<Suggestion>, DomainError>;

    /// All suggestions the profile has rejected, with their reasons.
    async fn rejected(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<RejectedSuggestion>, DomainError>;
}
