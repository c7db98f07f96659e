//! Session state machine domain types.

mod context;
mod errors;
mod phase;

pub use context::SessionContext;
pub use errors::SessionError;
pub use phase::SessionPhase;
