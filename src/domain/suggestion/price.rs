//! Normalized price representation for suggestions.
//!
//! Source deployments disagree on shape: some carry structured line items
//! with a precomputed total, others only a total. `PriceBreakdown::normalized`
//! resolves the disagreement once, at construction: when line items exist
//! their sum is the authoritative total and any precomputed value is
//! discarded; an item-less breakdown keeps the precomputed total as-is.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One named cost component of a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub description: String,
    pub amount: Decimal,
}

/// Ordered cost breakdown with a derived total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    line_items: Vec<LineItem>,
    currency: String,
    total_cost: Decimal,
}

impl PriceBreakdown {
    /// Builds a breakdown, deriving the total from line items when present.
    pub fn normalized(
        line_items: Vec<LineItem>,
        currency: impl Into<String>,
        precomputed_total: Option<Decimal>,
    ) -> Self {
        let total_cost = if line_items.is_empty() {
            precomputed_total.unwrap_or(Decimal::ZERO)
        } else {
            line_items.iter().map(|item| item.amount).sum()
        };
        Self {
            line_items,
            currency: currency.into(),
            total_cost,
        }
    }

    /// Returns the ordered line items.
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Returns the currency code (e.g. "SEK").
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the derived total cost.
    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    /// Whether a server-precomputed total agrees with the line-item sum.
    ///
    /// Always true for item-less breakdowns; the line-item sum is the
    /// authoritative side of any disagreement.
    pub fn agrees_with(&self, precomputed_total: Decimal) -> bool {
        if self.line_items.is_empty() {
            return true;
        }
        self.total_cost == precomputed_total
    }
}
