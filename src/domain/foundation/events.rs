//! Event infrastructure for refresh signal publishing.
//!
//! Mutating operations (accept/reject, reset) publish envelopes that
//! history-view consumers observe. Events are a notification mechanism,
//! not a source of truth: consumers re-fetch from the authoritative
//! backend rather than patching local state from payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::{DomainError, ErrorCode, Timestamp};

/// Unique identifier for events (used for deduplication).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new random EventId using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates an EventId from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport envelope for session events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique ID for this event instance.
    pub event_id: EventId,

    /// Event type for routing (e.g., "suggestion.accepted").
    pub event_type: String,

    /// ID of the aggregate the event concerns (profile id for session events).
    pub aggregate_id: String,

    /// When the event occurred.
    pub occurred_at: Timestamp,

    /// Event-specific payload as JSON.
    pub payload: JsonValue,
}

impl EventEnvelope {
    /// Creates an envelope for a freshly occurred event.
    pub fn new(
        event_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        payload: JsonValue,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            event_type: event_type.into(),
            aggregate_id: aggregate_id.into(),
            occurred_at: Timestamp::now(),
            payload,
        }
    }

    /// Deserializes the payload into a typed value.
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, DomainError> {
        serde_json::from_value(self.payload.clone()).map_err(|e| {
            DomainError::new(
                ErrorCode::DecodeError,
                format!("Failed to decode event payload: {}", e),
            )
        })
    }
}
