//! In-memory event bus.
//!
//! Synchronous, deterministic delivery suitable for a single-process
//! client and for tests. Published events are captured for assertions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

/// In-memory event bus.
///
/// # Panics
///
/// Methods panic if internal locks are poisoned; a poisoned lock means a
/// handler already panicked and the bus state is suspect.
pub struct InMemoryEventBus {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    published: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            published: RwLock::new(Vec::new()),
        }
    }

    // === Test helpers ===

    /// Returns all published events (for assertions).
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published_events()
            .iter()
            .any(|e| e.event_type == event_type)
    }

    /// Clears all published events (for test isolation).
    pub fn clear(&self) {
        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .clear();
    }

    fn handlers_for(&self, event_type: &str) -> Vec<Arc<dyn EventHandler>> {
        self.handlers
            .read()
            .expect("InMemoryEventBus: handlers lock poisoned")
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .push(event.clone());

        for handler in self.handlers_for(&event.event_type) {
            if let Err(err) = handler.handle(event.clone()).await {
                // Handler isolation: log and keep delivering.
                tracing::warn!(
                    handler = handler.name(),
                    event_type = %event.event_type,
                    error = %err,
                    "event handler failed"
                );
            }
        }
        Ok(())
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        self.handlers
            .write()
            .expect("InMemoryEventBus: handlers write lock poisoned")
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }

    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>) {
        for event_type in event_types {
            self.subscribe(event_type, handler.clone());
        }
    }
}
