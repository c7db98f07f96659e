//! Profile value objects.
//!
//! A profile is created once per session by the remote backend and is
//! immutable from this crate's perspective; it is dropped on reset.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProfileId, ValidationError};
use crate::domain::suggestion::SuggestionMode;

/// Minimum accepted age for a profile.
pub const MIN_AGE: u8 = 18;

/// Maximum accepted age for a profile.
pub const MAX_AGE: u8 = 100;

/// Gender attribute for profile generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

/// Attributes submitted to create a remote profile.
///
/// # Invariants
///
/// - `age` is within [`MIN_AGE`]..=[`MAX_AGE`]
/// - `capital` is non-negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProfile {
    pub gender: Gender,
    pub age: u8,
    /// Leisure budget ceiling, currency-denominated.
    pub capital: Decimal,
    /// Optional generation-style preference; the review loop's queue
    /// selection is authoritative when both are present.
    pub mode: Option<SuggestionMode>,
}

impl NewProfile {
    /// Validates the client-side field constraints.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if age is outside the accepted range
    /// - `InvalidFormat` if capital is negative
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.age < MIN_AGE || self.age > MAX_AGE {
            return Err(ValidationError::out_of_range(
                "age",
                MIN_AGE as i64,
                MAX_AGE as i64,
                self.age as i64,
            ));
        }
        if self.capital < Decimal::ZERO {
            return Err(ValidationError::invalid_format(
                "capital",
                "Capital must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Profile identity and summary returned by the backend on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedProfile {
    pub profile_id: ProfileId,
    /// One or two sentences describing the generated persona.
    pub profile_summary: String,
    /// Capital ceiling echoed back for budget tracking.
    pub capital: Decimal,
    /// Mode echoed back when one was submitted.
    pub mode: Option<SuggestionMode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_profile() -> NewProfile {
        NewProfile {
            gender: Gender::Unspecified,
            age: 34,
            capital: dec!(50000),
            mode: None,
        }
    }

    #[test]
    fn valid_profile_passes_validation() {
        assert!(valid_profile().validate().is_ok());
    }

    #[test]
    fn underage_profile_is_rejected() {
        let profile = NewProfile {
            age: 17,
            ..valid_profile()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn age_above_ceiling_is_rejected() {
        let profile = NewProfile {
            age: 101,
            ..valid_profile()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn negative_capital_is_rejected() {
        let profile = NewProfile {
            capital: dec!(-1),
            ..valid_profile()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn zero_capital_is_allowed() {
        let profile = NewProfile {
            capital: Decimal::ZERO,
            ..valid_profile()
        };
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn gender_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&Gender::Unspecified).unwrap(),
            "\"UNSPECIFIED\""
        );
    }
}
