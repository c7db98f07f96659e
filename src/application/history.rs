//! History projections - accepted and rejected views over the backend.
//!
//! History is never mutated locally. Views read the backend's lists, and a
//! refresh handler re-reads them whenever a verdict event is published.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::{Arc, RwLock};

use crate::domain::budget::BudgetReport;
use crate::domain::foundation::{DomainError, EventEnvelope, ProfileId};
use crate::domain::suggestion::{RejectedSuggestion, Suggestion};
use crate::ports::{EventHandler, HistoryReader};

use super::session_flow::VerdictEvent;

/// Accepted history together with the derived budget position.
#[derive(Debug, Clone)]
pub struct AcceptedOverview {
    pub suggestions: Vec<Suggestion>,
    pub budget: BudgetReport,
}

/// Read-side service over the [`HistoryReader`] port.
pub struct HistoryService {
    reader: Arc<dyn HistoryReader>,
}

impl HistoryService {
    pub fn new(reader: Arc<dyn HistoryReader>) -> Self {
        Self { reader }
    }

    /// Accepted suggestions with budget usage against the given capital.
    pub async fn accepted_overview(
        &self,
        profile_id: &ProfileId,
        capital: Decimal,
    ) -> Result<AcceptedOverview, DomainError> {
        let suggestions = self.reader.accepted(profile_id).await?;
        let budget = BudgetReport::derive(&suggestions, capital);
        Ok(AcceptedOverview {
            suggestions,
            budget,
        })
    }

    /// Rejected suggestions with their recorded reasons.
    pub async fn rejected(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<RejectedSuggestion>, DomainError> {
        self.reader.rejected(profile_id).await
    }
}

/// Point-in-time copy of both histories and the budget position.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    pub profile_id: ProfileId,
    pub accepted: Vec<Suggestion>,
    pub rejected: Vec<RejectedSuggestion>,
    pub budget: BudgetReport,
}

/// Event handler that refreshes the history snapshot on every verdict.
///
/// Full re-reads keep the snapshot consistent with the backend as the
/// single source of truth; duplicated events just refresh twice.
pub struct HistoryRefreshHandler {
    reader: Arc<dyn HistoryReader>,
    snapshot: RwLock<Option<HistorySnapshot>>,
}

impl HistoryRefreshHandler {
    pub fn new(reader: Arc<dyn HistoryReader>) -> Self {
        Self {
            reader,
            snapshot: RwLock::new(None),
        }
    }

    /// Latest snapshot, if any verdict has been observed.
    pub fn snapshot(&self) -> Option<HistorySnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl EventHandler for HistoryRefreshHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let verdict: VerdictEvent = event.payload_as()?;

        let accepted = self.reader.accepted(&verdict.profile_id).await?;
        let rejected = self.reader.rejected(&verdict.profile_id).await?;
        let budget = BudgetReport::derive(&accepted, verdict.capital);

        tracing::debug!(
            profile_id = %verdict.profile_id,
            accepted = accepted.len(),
            rejected = rejected.len(),
            "history snapshot refreshed"
        );

        *self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(HistorySnapshot {
            profile_id: verdict.profile_id,
            accepted,
            rejected,
            budget,
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "history-refresh"
    }
}
