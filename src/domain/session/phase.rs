//! Session phase state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// User-facing phase of a review session.
///
/// `onboarding -> category-selection -> loading <-> suggestions`, with
/// `error` reachable from every networked transition. Reset returns to
/// `onboarding` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPhase {
    Onboarding,
    CategorySelection,
    Loading,
    Suggestions,
    Error,
}

impl StateMachine for SessionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionPhase::*;
        // Reset is valid from every phase.
        if *target == Onboarding {
            return true;
        }
        matches!(
            (self, target),
            (Onboarding, CategorySelection)
                | (Onboarding, Error)
                | (CategorySelection, Loading)
                | (CategorySelection, Error)
                | (Loading, Suggestions)
                | (Loading, Error)
                | (Suggestions, Loading)
                | (Suggestions, Error)
                // Queue-exhausted recovery: pick a different queue key.
                | (Error, Loading)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionPhase::*;
        match self {
            Onboarding => vec![CategorySelection, Error, Onboarding],
            CategorySelection => vec![Loading, Error, Onboarding],
            Loading => vec![Suggestions, Error, Onboarding],
            Suggestions => vec![Loading, Error, Onboarding],
            Error => vec![Loading, Onboarding],
        }
    }
}
