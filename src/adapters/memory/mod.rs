//! In-memory adapters for testing.

mod server;

pub use server::InMemorySuggestionServer;
