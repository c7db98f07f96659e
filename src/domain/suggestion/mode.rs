//! Suggestion generation style, orthogonal to the category axis.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generation style for a suggestion queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionMode {
    /// Popular, well-known items most people would enjoy.
    Proven,
    /// Unique, uncommon experiences people generally would not think of.
    Creative,
}

impl SuggestionMode {
    /// Human-readable mode name.
    pub fn display_name(&self) -> &'static str {
        match self {
            SuggestionMode::Proven => "Proven Ideas",
            SuggestionMode::Creative => "Creative Ideas",
        }
    }

    /// Wire name used in queue requests.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            SuggestionMode::Proven => "PROVEN",
            SuggestionMode::Creative => "CREATIVE",
        }
    }
}

impl fmt::Display for SuggestionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
