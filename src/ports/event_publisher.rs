//! EventPublisher port - publishing session events.
//!
//! Verdict submissions publish explicit refresh events for history
//! consumers instead of mutating anything in place.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing session events.
///
/// Implementations must ensure:
/// - Events are delivered at-least-once (handlers may receive duplicates)
/// - Errors are propagated to the caller
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;
}
