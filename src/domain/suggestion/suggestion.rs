//! The canonical suggestion entity and the queue key that scopes it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SuggestionId;

use super::{PriceBreakdown, SpendingCategory, SuggestionMode};

/// The (category, mode) tuple scoping which suggestion queue is drawn from.
///
/// Combined with a profile id this identifies one server-side queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueKey {
    pub category: SpendingCategory,
    pub mode: SuggestionMode,
}

impl QueueKey {
    pub fn new(category: SpendingCategory, mode: SuggestionMode) -> Self {
        Self { category, mode }
    }
}

/// A personalized bucket list suggestion.
///
/// Immutable once issued. Its lifecycle ends when a verdict is recorded
/// against it: it leaves the pending queue and becomes accepted or
/// rejected, never returning to pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    id: SuggestionId,
    title: String,
    description: String,
    category: String,
    price_breakdown: PriceBreakdown,
    rejection_reasons: Vec<String>,
}

impl Suggestion {
    pub fn new(
        id: SuggestionId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        price_breakdown: PriceBreakdown,
        rejection_reasons: Vec<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            category: category.into(),
            price_breakdown,
            rejection_reasons,
        }
    }

    pub fn id(&self) -> &SuggestionId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Category tag as issued by the generator (display name, not queue key).
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price_breakdown(&self) -> &PriceBreakdown {
        &self.price_breakdown
    }

    /// Canned rejection reasons offered as a fixed menu for this suggestion.
    pub fn rejection_reasons(&self) -> &[String] {
        &self.rejection_reasons
    }
}
