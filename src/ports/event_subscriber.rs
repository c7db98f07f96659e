//! EventSubscriber port - registering interest in session events.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing session events.
///
/// Implementations should be:
/// - **Idempotent** - safe to call multiple times with the same event
/// - **Isolated** - errors don't affect other handlers
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to session events.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event type.
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe handler to multiple event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

/// Combined trait for event bus implementations.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

// Blanket implementation - any type that implements both traits is an EventBus
impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}
