//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the session core and the suggestion backend. Adapters implement them.
//!
//! The backend is the sole arbiter of suggestion resolution state; every
//! port here treats it as authoritative, never as a cache to reconcile.

mod credential_gate;
mod event_publisher;
mod event_subscriber;
mod feedback_sink;
mod history_reader;
mod profile_gateway;
mod suggestion_queue;

pub use credential_gate::CredentialGate;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use feedback_sink::{FeedbackRecord, FeedbackSink};
pub use history_reader::HistoryReader;
pub use profile_gateway::ProfileGateway;
pub use suggestion_queue::SuggestionQueue;
