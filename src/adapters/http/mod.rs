//! HTTP adapter for the suggestion backend.
//!
//! Implements every server-side port over the backend's JSON/HTTP API.
//! Field names follow the backend's camelCase wire contract; deployment
//! differences in suggestion shape are normalized in [`dto`].

mod backend;
mod dto;

pub use backend::HttpBackend;
