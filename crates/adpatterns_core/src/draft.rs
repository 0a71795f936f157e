//! crates/adpatterns_core/src/draft.rs
//!
//! Assembles campaign drafts from a product payload and generated copy, and
//! maps drafts onto the backend's campaign creation schema.

use crate::domain::{
    field, AdCreative, AdSet, CampaignCreate, CampaignDraft, CampaignObjective, CampaignStatus,
    Creative, Platform, ProductPayload, SuggestionCriteria, SuggestionResult, Targeting,
};
use crate::ports::{RandomSource, SuggestionService};
use crate::store::DraftStore;
use crate::suggestions::{distinct, fetch_suggestions, pick_two};
use chrono::{DateTime, Utc};
use tracing::info;

pub const DEFAULT_AGE_MIN: u32 = 18;
pub const DEFAULT_AGE_MAX: u32 = 45;
pub const DEFAULT_BUDGET_DAILY: &str = "₹500";
pub const DEFAULT_CTA: &str = "Shop Now";
pub const DEFAULT_URL: &str = "https://example.com";
const FALLBACK_BUDGET: f64 = 100.0;
const DEFAULT_AD_ACCOUNT: &str = "default-account";

/// Builds a draft from a payload and whatever copy the backend produced.
pub fn build_draft(
    payload: &ProductPayload,
    platform: Platform,
    suggestions: &SuggestionResult,
) -> CampaignDraft {
    let name = field(&payload.name);

    let campaign_name = match name {
        Some(name) => format!("{} — {} Campaign", name, platform),
        None => format!("New {} Campaign", platform),
    };

    let headline = match (suggestions.headlines.first(), name) {
        (Some(headline), _) => headline.clone(),
        (None, Some(name)) => format!("{}: Special Offer", name),
        (None, None) => "Great product — Try now".to_string(),
    };

    let description = match distinct(&suggestions.descriptions).as_slice() {
        [first, second, ..] => format!("{} {}", first, second),
        [only] => only.clone(),
        [] => SuggestionResult::fallback_description(payload),
    };

    let keywords = if suggestions.keywords.is_empty() {
        field(&payload.category).map(str::to_string).into_iter().collect()
    } else {
        suggestions.keywords.clone()
    };

    let cta = if suggestions.cta.is_empty() {
        DEFAULT_CTA.to_string()
    } else {
        suggestions.cta.clone()
    };

    CampaignDraft {
        campaign_name,
        objective: "Sales".to_string(),
        budget_daily: DEFAULT_BUDGET_DAILY.to_string(),
        adset: AdSet {
            age_min: ProductPayload::parse_age(&payload.age_min).unwrap_or(DEFAULT_AGE_MIN),
            age_max: ProductPayload::parse_age(&payload.age_max).unwrap_or(DEFAULT_AGE_MAX),
            gender: field(&payload.gender).unwrap_or("Male").to_string(),
            location: field(&payload.location).unwrap_or("All locations").to_string(),
            interests: vec![field(&payload.target).unwrap_or("General").to_string()],
            keywords,
            url: DEFAULT_URL.to_string(),
        },
        creative: Creative {
            headline,
            description,
            cta,
            image: None,
        },
    }
}

/// Fetches suggestions once, builds a draft and persists it as the last campaign.
pub async fn generate_draft(
    service: &dyn SuggestionService,
    store: &DraftStore,
    payload: &ProductPayload,
    platform: Platform,
) -> CampaignDraft {
    let criteria = SuggestionCriteria::from_payload(payload, platform);
    let suggestions = fetch_suggestions(service, &criteria).await;
    let draft = build_draft(payload, platform, &suggestions);
    store.save_campaign(&draft);
    info!("Generated draft '{}'", draft.campaign_name);
    draft
}

/// Replaces the draft's headline, description, CTA and keywords with a random
/// selection from a fresh result. Returns `None` when the result is degraded.
pub fn regenerate_all(
    draft: &CampaignDraft,
    suggestions: &SuggestionResult,
    rng: &mut dyn RandomSource,
) -> Option<CampaignDraft> {
    if suggestions.degraded {
        return None;
    }
    let mut updated = draft.clone();

    if !suggestions.headlines.is_empty() {
        let idx = rng.pick(suggestions.headlines.len());
        updated.creative.headline = suggestions.headlines[idx].clone();
    }

    let descriptions = distinct(&suggestions.descriptions);
    if descriptions.len() >= 2 {
        let (a, b) = pick_two(rng, descriptions.len());
        updated.creative.description = format!("{} {}", descriptions[a], descriptions[b]);
    } else if let [only] = descriptions.as_slice() {
        updated.creative.description = only.clone();
    }

    if !suggestions.cta.is_empty() {
        updated.creative.cta = suggestions.cta.clone();
    }
    if !suggestions.keywords.is_empty() {
        updated.adset.keywords = suggestions.keywords.clone();
    }
    Some(updated)
}

/// Reads the number out of a budget like `"₹500"`.
fn parse_budget(budget: &str) -> Option<f64> {
    let digits: String = budget
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok().filter(|b| *b > 0.0)
}

impl CampaignDraft {
    /// Maps the draft onto the campaign creation schema. New campaigns always start as drafts.
    pub fn to_campaign_create(
        &self,
        payload: Option<&ProductPayload>,
        platform: Platform,
        now: DateTime<Utc>,
    ) -> CampaignCreate {
        let non_empty_or = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        CampaignCreate {
            name: non_empty_or(&self.campaign_name, "Untitled Campaign"),
            platform: platform.slug().to_string(),
            objective: CampaignObjective::Sales,
            budget: parse_budget(&self.budget_daily).unwrap_or(FALLBACK_BUDGET),
            budget_type: "daily".to_string(),
            start_date: now,
            end_date: None,
            ad_account_id: DEFAULT_AD_ACCOUNT.to_string(),
            status: CampaignStatus::Draft,
            targeting: Targeting {
                age_min: self.adset.age_min,
                age_max: self.adset.age_max,
                gender: payload
                    .and_then(|p| field(&p.gender))
                    .unwrap_or("All")
                    .to_string(),
                locations: self.adset.locations(),
                interests: self.adset.keywords.clone(),
            },
            ad_creative: AdCreative {
                headline: self.creative.headline.clone(),
                description: self.creative.description.clone(),
                cta: non_empty_or(&self.creative.cta, "Learn More"),
                image_url: self.creative.image.clone().unwrap_or_default(),
                link_url: self.adset.url.clone(),
            },
        }
    }
}
