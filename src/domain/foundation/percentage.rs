//! Percentage value object (0-100 scale).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A display percentage between 0 and 100 inclusive.
///
/// The clamp makes this suitable for progress-style display only; callers
/// that need the raw ratio (e.g. over-budget checks) must compute it from
/// the underlying amounts before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a Percentage, returning error if out of range.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if value > 100 {
            return Err(ValidationError::out_of_range(
                "percentage",
                0,
                100,
                value as i64,
            ));
        }
        Ok(Self(value))
    }

    /// Derives a clamped display percentage from a part/whole ratio.
    ///
    /// A non-positive part or whole yields 0%. Ratios above 1.0 clamp to 100%.
    pub fn from_ratio(part: Decimal, whole: Decimal) -> Self {
        if whole <= Decimal::ZERO || part <= Decimal::ZERO {
            return Self::ZERO;
        }
        let percent = (part / whole * Decimal::from(100))
            .round()
            .to_u8()
            .unwrap_or(100);
        Self::new(percent)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns the value as a fraction (0.0 to 1.0).
    pub fn as_fraction(&self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn percentage_new_clamps_to_100() {
        assert_eq!(Percentage::new(101).value(), 100);
        assert_eq!(Percentage::new(255).value(), 100);
    }

    #[test]
    fn percentage_try_new_rejects_out_of_range() {
        assert!(Percentage::try_new(100).is_ok());
        assert!(Percentage::try_new(101).is_err());
    }

    #[test]
    fn from_ratio_computes_display_percent() {
        assert_eq!(Percentage::from_ratio(dec!(30000), dec!(50000)).value(), 60);
        assert_eq!(Percentage::from_ratio(dec!(0), dec!(50000)).value(), 0);
    }

    #[test]
    fn from_ratio_clamps_over_100() {
        // 55000 / 50000 is a raw ratio of 110%
        assert_eq!(Percentage::from_ratio(dec!(55000), dec!(50000)).value(), 100);
    }

    #[test]
    fn from_ratio_handles_zero_whole() {
        assert_eq!(Percentage::from_ratio(dec!(100), Decimal::ZERO), Percentage::ZERO);
    }

    proptest! {
        #[test]
        fn from_ratio_never_leaves_display_range(part in 0u64..10_000_000, whole in 0u64..10_000_000) {
            let pct = Percentage::from_ratio(Decimal::from(part), Decimal::from(whole));
            prop_assert!(pct.value() <= 100);
        }
    }
}
