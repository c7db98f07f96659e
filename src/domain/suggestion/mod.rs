//! Suggestion domain types.
//!
//! One canonical `Suggestion` shape is used everywhere; deployment-specific
//! wire shapes are normalized into it at the adapter boundary so budget and
//! history logic never branch on shape.

mod category;
mod mode;
mod price;
mod rejected;
#[allow(clippy::module_inception)]
mod suggestion;
mod verdict;

pub use category::SpendingCategory;
pub use mode::SuggestionMode;
pub use price::{LineItem, PriceBreakdown};
pub use rejected::RejectedSuggestion;
pub use suggestion::{QueueKey, Suggestion};
pub use verdict::{RejectionFeedback, Verdict};
