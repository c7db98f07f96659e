//! Shared value objects and infrastructure types for the domain layer.

mod errors;
mod events;
mod ids;
mod percentage;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{EventEnvelope, EventId};
pub use ids::{ProfileId, SuggestionId};
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
