//! Wire DTOs for the suggestion backend.
//!
//! Suggestion payloads vary across backend deployments: some carry a
//! structured `priceBreakdown` with a precomputed `totalCost`, others a
//! flat `budgetBreakdown` item list or a bare `estimatedCost`. The
//! conversions here normalize all of them into the one canonical
//! `Suggestion` shape so nothing downstream branches on wire shape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{SuggestionId, Timestamp};
use crate::domain::profile::{CreatedProfile, Gender, NewProfile};
use crate::domain::suggestion::{
    LineItem, PriceBreakdown, RejectedSuggestion, SpendingCategory, Suggestion, SuggestionMode,
    Verdict,
};

/// Fallback currency when the wire carries none.
const DEFAULT_CURRENCY: &str = "SEK";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequestDto {
    pub gender: Gender,
    pub age: u8,
    pub capital: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<SuggestionMode>,
}

impl From<&NewProfile> for CreateProfileRequestDto {
    fn from(profile: &NewProfile) -> Self {
        Self {
            gender: profile.gender,
            age: profile.age,
            capital: profile.capital,
            mode: profile.mode,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileResponseDto {
    pub profile_id: Uuid,
    pub profile_summary: String,
    /// Echoed by newer deployments; older ones omit it.
    pub capital: Option<Decimal>,
    pub mode: Option<SuggestionMode>,
}

impl CreateProfileResponseDto {
    /// Converts to the domain shape, falling back to the submitted
    /// capital when the response does not echo it.
    pub fn into_domain(self, submitted_capital: Decimal) -> CreatedProfile {
        CreatedProfile {
            profile_id: crate::domain::foundation::ProfileId::from_uuid(self.profile_id),
            profile_summary: self.profile_summary,
            capital: self.capital.unwrap_or(submitted_capital),
            mode: self.mode,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDto {
    /// Older deployments name this `name`, newer ones `category`.
    #[serde(alias = "category")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Older deployments name this `price`.
    #[serde(alias = "price")]
    pub amount: Decimal,
}

impl From<LineItemDto> for LineItem {
    fn from(dto: LineItemDto) -> Self {
        LineItem {
            name: dto.name,
            description: dto.description,
            amount: dto.amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdownDto {
    #[serde(default)]
    pub line_items: Vec<LineItemDto>,
    pub currency: Option<String>,
    pub total_cost: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionDto {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price_breakdown: Option<PriceBreakdownDto>,
    /// Flat item list used by deployments without `priceBreakdown`.
    #[serde(default)]
    pub budget_breakdown: Option<Vec<LineItemDto>>,
    /// Bare total used by deployments with neither shape.
    #[serde(default)]
    pub estimated_cost: Option<Decimal>,
    #[serde(default)]
    pub rejection_reasons: Vec<String>,
}

impl SuggestionDto {
    pub fn into_domain(self) -> Suggestion {
        let (items, currency, precomputed) = match (self.price_breakdown, self.budget_breakdown) {
            (Some(breakdown), _) => (
                breakdown.line_items,
                breakdown.currency,
                breakdown.total_cost,
            ),
            (None, Some(items)) => (items, None, self.estimated_cost),
            (None, None) => (Vec::new(), None, self.estimated_cost),
        };
        let line_items = items.into_iter().map(LineItem::from).collect();
        Suggestion::new(
            SuggestionId::from_uuid(self.id),
            self.title,
            self.description,
            self.category.unwrap_or_default(),
            PriceBreakdown::normalized(
                line_items,
                currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                precomputed,
            ),
            self.rejection_reasons,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponseDto {
    #[serde(default)]
    pub suggestions: Vec<SuggestionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedSuggestionDto {
    #[serde(flatten)]
    pub suggestion: SuggestionDto,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub is_custom_reason: Option<bool>,
    #[serde(default)]
    pub rejected_at: Option<DateTime<Utc>>,
}

impl RejectedSuggestionDto {
    pub fn into_domain(self) -> RejectedSuggestion {
        RejectedSuggestion::new(
            self.suggestion.into_domain(),
            self.reason.unwrap_or_default(),
            self.is_custom_reason.unwrap_or(false),
            self.rejected_at.map(Timestamp::from_datetime),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedSuggestionsResponseDto {
    #[serde(default)]
    pub suggestions: Vec<RejectedSuggestionDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefillRequestDto {
    pub profile_id: Uuid,
    pub category: SpendingCategory,
    pub mode: SuggestionMode,
    pub batch_size: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequestDto {
    pub profile_id: Uuid,
    pub suggestion_id: Uuid,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_custom_reason: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequestDto {
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponseDto {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyStatusResponseDto {
    pub has_valid_key: bool,
}
