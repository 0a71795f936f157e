//! crates/adpatterns_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! The JSON shapes match what the dashboard front end and the campaign
//! backend exchange, so every struct here doubles as a storage record.

use crate::summary::pick_cta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//=========================================================================================
// Product Payload
//=========================================================================================

/// The product description collected by the intake form.
///
/// `price` and the `price_min`/`price_max` range are mutually exclusive; use
/// [`ProductPayload::set_price`] and [`ProductPayload::set_price_range`] when
/// editing a stored payload so the invariant holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_max: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_max: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl ProductPayload {
    /// Sets a single price. A non-empty price clears the price range.
    pub fn set_price(&mut self, price: impl Into<String>) {
        let price = price.into();
        if !price.is_empty() {
            self.price_min = None;
            self.price_max = None;
        }
        self.price = non_empty(price);
    }

    /// Sets the price range. A non-empty bound clears the single price.
    pub fn set_price_range(&mut self, min: impl Into<String>, max: impl Into<String>) {
        let (min, max) = (min.into(), max.into());
        if !min.is_empty() || !max.is_empty() {
            self.price = None;
        }
        self.price_min = non_empty(min);
        self.price_max = non_empty(max);
    }

    /// Returns `"min-max"` only when both bounds are present.
    pub fn price_range(&self) -> Option<String> {
        match (field(&self.price_min), field(&self.price_max)) {
            (Some(min), Some(max)) => Some(format!("{}-{}", min, max)),
            _ => None,
        }
    }

    pub fn has_price(&self) -> bool {
        field(&self.price).is_some() || self.price_range().is_some()
    }

    /// Parses an age field, ignoring anything that is not a number.
    pub fn parse_age(value: &Option<String>) -> Option<u32> {
        field(value).and_then(|v| v.parse().ok())
    }
}

/// An inline edit of a stored payload. Absent fields are left alone; an empty
/// string clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayloadUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub location: Option<String>,
    pub target: Option<String>,
    pub age_min: Option<String>,
    pub age_max: Option<String>,
    pub gender: Option<String>,
}

impl ProductPayload {
    /// Applies an inline edit. Price fields go through [`ProductPayload::set_price`]
    /// and [`ProductPayload::set_price_range`]; a non-empty single price wins
    /// over a range sent in the same update.
    pub fn apply(&mut self, update: PayloadUpdate) {
        let text_fields = [
            (&mut self.name, update.name),
            (&mut self.category, update.category),
            (&mut self.description, update.description),
            (&mut self.location, update.location),
            (&mut self.target, update.target),
            (&mut self.age_min, update.age_min),
            (&mut self.age_max, update.age_max),
            (&mut self.gender, update.gender),
        ];
        for (slot, value) in text_fields {
            if let Some(value) = value {
                *slot = non_empty(value);
            }
        }

        if update.price_min.is_some() || update.price_max.is_some() {
            let min = update.price_min.or_else(|| self.price_min.clone()).unwrap_or_default();
            let max = update.price_max.or_else(|| self.price_max.clone()).unwrap_or_default();
            self.set_price_range(min, max);
        }
        if let Some(price) = update.price {
            self.set_price(price);
        }
    }
}

/// Treats empty and whitespace-only strings as absent.
pub fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

//=========================================================================================
// Platform
//=========================================================================================

/// The advertising platform a campaign targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[default]
    Meta,
    Google,
    LinkedIn,
    Twitter,
}

impl Platform {
    /// The lowercase identifier the campaign backend expects.
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::Meta => "meta",
            Platform::Google => "google",
            Platform::LinkedIn => "linkedin",
            Platform::Twitter => "twitter",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Meta => "Meta",
            Platform::Google => "Google",
            Platform::LinkedIn => "LinkedIn",
            Platform::Twitter => "Twitter",
        };
        f.write_str(name)
    }
}

//=========================================================================================
// Suggestions
//=========================================================================================

/// The request body of the suggestion backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionCriteria {
    pub category: String,
    pub user_description: Option<String>,
    pub price: Option<String>,
    pub price_range: Option<String>,
    pub gender: String,
    pub age_min: u32,
    pub age_max: u32,
    pub locations: Option<String>,
    pub target_audience: Option<String>,
    pub platform: String,
    /// Only used locally for the fallback CTA; the backend does not take it.
    #[serde(skip)]
    pub product_type: Option<String>,
}

impl SuggestionCriteria {
    /// Derives the criteria from a stored payload, applying the backend's defaults.
    pub fn from_payload(payload: &ProductPayload, platform: Platform) -> Self {
        Self {
            category: field(&payload.category).unwrap_or("Clothing").to_string(),
            user_description: payload.description.clone(),
            price: field(&payload.price).map(str::to_string),
            price_range: payload.price_range(),
            gender: field(&payload.gender).unwrap_or("Male").to_string(),
            age_min: ProductPayload::parse_age(&payload.age_min).unwrap_or(1),
            age_max: ProductPayload::parse_age(&payload.age_max).unwrap_or(100),
            locations: payload.location.clone(),
            target_audience: payload.target.clone(),
            platform: platform.to_string(),
            product_type: field(&payload.product_type).map(str::to_string),
        }
    }

    pub fn has_price(&self) -> bool {
        self.price.is_some() || self.price_range.is_some()
    }
}

/// AI-generated ad copy returned by the suggestion backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResult {
    #[serde(default)]
    pub headlines: Vec<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub image_prompts: Vec<String>,
    #[serde(default)]
    pub cta: String,
    #[serde(default)]
    pub total_matches: u64,
    /// Set when the result was produced locally after a failed fetch.
    #[serde(skip)]
    pub degraded: bool,
}

impl SuggestionResult {
    /// The result used when the backend could not be reached.
    pub fn degraded(criteria: &SuggestionCriteria) -> Self {
        let cta = pick_cta(criteria.has_price(), criteria.product_type.as_deref());
        Self {
            cta: cta.to_string(),
            degraded: true,
            ..Self::default()
        }
    }

    /// A description derived from the product itself, for when no copy was generated.
    pub fn fallback_description(payload: &ProductPayload) -> String {
        field(&payload.description)
            .unwrap_or("High quality, reliable and designed for you.")
            .to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty() && self.descriptions.is_empty() && self.keywords.is_empty()
    }
}

//=========================================================================================
// Campaign Draft
//=========================================================================================

/// A campaign assembled from a product payload and generated copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub campaign_name: String,
    pub objective: String,
    pub budget_daily: String,
    pub adset: AdSet,
    pub creative: Creative,
}

/// Audience targeting of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSet {
    pub age_min: u32,
    pub age_max: u32,
    pub gender: String,
    pub location: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub url: String,
}

impl AdSet {
    /// The selected locations, without the "All locations" placeholder.
    pub fn locations(&self) -> Vec<String> {
        self.location
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty() && *l != "All locations")
            .map(str::to_string)
            .collect()
    }
}

/// The ad copy and imagery of a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creative {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

//=========================================================================================
// Campaign Creation Schema
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignObjective {
    Awareness,
    Traffic,
    Engagement,
    Leads,
    Sales,
    AppPromotion,
}

/// The platform-agnostic body of a campaign creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignCreate {
    pub name: String,
    pub platform: String,
    pub objective: CampaignObjective,
    pub budget: f64,
    pub budget_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub ad_account_id: String,
    pub status: CampaignStatus,
    pub targeting: Targeting,
    pub ad_creative: AdCreative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targeting {
    pub age_min: u32,
    pub age_max: u32,
    pub gender: String,
    pub locations: Vec<String>,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdCreative {
    pub headline: String,
    pub description: String,
    pub cta: String,
    pub image_url: String,
    pub link_url: String,
}

//=========================================================================================
// Accounts, Preferences and Notifications
//=========================================================================================

/// An ad account connected to the dashboard (demo data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdAccount {
    pub id: String,
    pub name: String,
    pub connected_at: String,
    pub platform: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient, dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Error, message: message.into() }
    }
}
