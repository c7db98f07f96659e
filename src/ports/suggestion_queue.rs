//! SuggestionQueue port - the pending-suggestion queue per queue key.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::suggestion::{QueueKey, Suggestion};

/// Port over the server-side pending-suggestion queue.
///
/// `next` returning `Ok(None)` is the empty-queue signal, not an error;
/// the caller decides whether to refill. Implementations must map the
/// backend's "no content" response (HTTP 204/404) to `None` rather than
/// an `Err`.
#[async_trait]
pub trait SuggestionQueue: Send + Sync {
    /// Fetches the next pending suggestion for the queue key, if any.
    async fn next(
        &self,
        profile_id: &ProfileId,
        key: &QueueKey,
    ) -> Result<Option<Suggestion>, DomainError>;

    /// Requests server-side generation of up to `batch_size` new pending
    /// suggestions for the queue key.
    ///
    /// Returns the number actually created; fewer than requested,
    /// including zero, is a valid outcome.
    async fn refill(
        &self,
        profile_id: &ProfileId,
        key: &QueueKey,
        batch_size: u8,
    ) -> Result<usize, DomainError>;
}
