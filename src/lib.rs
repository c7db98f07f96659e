//! Bucket List Session - client-side suggestion session protocol.
//!
//! This crate drives a budget-aware bucket list review session against a
//! remote suggestion backend: profile creation, category/mode selection,
//! the suggestion review loop with queue refill, verdict feedback, and
//! derived budget/history views.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
