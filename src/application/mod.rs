//! Application layer - session orchestration and history projections.
//!
//! This layer coordinates domain state with the ports: the session flow
//! drives writes, the history services drive reads.

mod history;
mod queue_client;
mod session_flow;

pub use history::{AcceptedOverview, HistoryRefreshHandler, HistoryService, HistorySnapshot};
pub use queue_client::{QueueClient, QueueOutcome};
pub use session_flow::{
    SessionFlow, VerdictEvent, SUGGESTION_ACCEPTED, SUGGESTION_REJECTED,
};
