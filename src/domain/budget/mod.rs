//! Budget tracking over the accepted-suggestion list.
//!
//! A `BudgetReport` is a pure derivation: it is recomputed from the
//! authoritative accepted-list fetch on every refresh and never cached or
//! patched incrementally, so it cannot drift from the backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Percentage;
use crate::domain::suggestion::Suggestion;

/// Derived budget state for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    total_cost: Decimal,
    capital: Decimal,
    percent_used: Percentage,
    over_budget: bool,
}

impl BudgetReport {
    /// Derives the report from the accepted list and the capital ceiling.
    ///
    /// Total cost sums each suggestion's normalized breakdown (line-item
    /// sum where items exist, precomputed total otherwise). The displayed
    /// percentage is clamped to [0, 100]; the over-budget flag uses the
    /// unclamped comparison `total > capital`.
    pub fn derive(accepted: &[Suggestion], capital: Decimal) -> Self {
        let total_cost: Decimal = accepted
            .iter()
            .map(|s| s.price_breakdown().total_cost())
            .sum();
        Self {
            total_cost,
            capital,
            percent_used: Percentage::from_ratio(total_cost, capital),
            over_budget: total_cost > capital,
        }
    }

    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    pub fn capital(&self) -> Decimal {
        self.capital
    }

    /// Clamped display percentage of the capital ceiling consumed.
    pub fn percent_used(&self) -> Percentage {
        self.percent_used
    }

    pub fn is_over_budget(&self) -> bool {
        self.over_budget
    }

    /// Remaining headroom; negative once over budget.
    pub fn remaining(&self) -> Decimal {
        self.capital - self.total_cost
    }
}
