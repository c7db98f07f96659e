//! Domain layer - pure types and invariants, no I/O.

pub mod budget;
pub mod foundation;
pub mod profile;
pub mod session;
pub mod suggestion;
