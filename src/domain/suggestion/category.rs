//! Spending category axis for suggestion queues.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed set of spending domains a review loop can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpendingCategory {
    TravelVacation,
    LuxuryThings,
    HealthWellness,
    SocialLifestyle,
    MentalEmotional,
    SmallLuxury,
    FreedomComfort,
    OptionalAddons,
}

impl SpendingCategory {
    /// All categories, in presentation order.
    pub const ALL: [SpendingCategory; 8] = [
        SpendingCategory::TravelVacation,
        SpendingCategory::LuxuryThings,
        SpendingCategory::HealthWellness,
        SpendingCategory::SocialLifestyle,
        SpendingCategory::MentalEmotional,
        SpendingCategory::SmallLuxury,
        SpendingCategory::FreedomComfort,
        SpendingCategory::OptionalAddons,
    ];

    /// Human-readable category name.
    pub fn display_name(&self) -> &'static str {
        match self {
            SpendingCategory::TravelVacation => "Travel & Vacation",
            SpendingCategory::LuxuryThings => "Luxury Things",
            SpendingCategory::HealthWellness => "Health & Wellness",
            SpendingCategory::SocialLifestyle => "Social & Lifestyle",
            SpendingCategory::MentalEmotional => "Mental & Emotional Wellbeing",
            SpendingCategory::SmallLuxury => "Small Luxury Treats",
            SpendingCategory::FreedomComfort => "Freedom & Comfort",
            SpendingCategory::OptionalAddons => "Optional Add-ons",
        }
    }

    /// Wire name used in queue requests.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            SpendingCategory::TravelVacation => "TRAVEL_VACATION",
            SpendingCategory::LuxuryThings => "LUXURY_THINGS",
            SpendingCategory::HealthWellness => "HEALTH_WELLNESS",
            SpendingCategory::SocialLifestyle => "SOCIAL_LIFESTYLE",
            SpendingCategory::MentalEmotional => "MENTAL_EMOTIONAL",
            SpendingCategory::SmallLuxury => "SMALL_LUXURY",
            SpendingCategory::FreedomComfort => "FREEDOM_COMFORT",
            SpendingCategory::OptionalAddons => "OPTIONAL_ADDONS",
        }
    }
}

impl fmt::Display for SpendingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
