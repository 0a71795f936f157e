//! services/dashboard/src/web/preferences.rs
//!
//! The stored product payload, the selected platform and the theme.

use crate::web::state::AppState;
use adpatterns_core::{PayloadSummary, PayloadUpdate, Platform, ProductPayload, Theme};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

pub const NO_PAYLOAD_MESSAGE: &str = "No product details found. Fill in the product form first.";

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PlatformBody {
    /// `Meta`, `Google`, `LinkedIn` or `Twitter`.
    #[schema(value_type = String)]
    pub platform: Platform,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ThemeBody {
    /// `light` or `dark`.
    #[schema(value_type = String)]
    pub theme: Theme,
}

/// Either a single price or a range; the other form is cleared.
#[derive(Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PriceUpdate {
    Single { price: String },
    Range { min: String, max: String },
}

/// An inline edit from the summary card. Omitted fields stay as they are.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayloadRequest {
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

impl From<PayloadRequest> for PayloadUpdate {
    fn from(req: PayloadRequest) -> Self {
        Self {
            name: req.name,
            category: req.category,
            description: req.description,
            price: req.price,
            price_min: req.price_min,
            price_max: req.price_max,
            location: req.location,
            target: req.target,
            age_min: req.age_min,
            age_max: req.age_max,
            gender: req.gender,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[schema(value_type = String)]
    pub platform: Platform,
    pub audience: String,
    pub cta: String,
    pub age_range: String,
    pub audience_tags: Vec<String>,
    pub interests: Vec<String>,
}

fn stored_payload(state: &AppState) -> Result<ProductPayload, (StatusCode, String)> {
    state
        .store
        .last_payload()
        .ok_or_else(|| (StatusCode::NOT_FOUND, NO_PAYLOAD_MESSAGE.to_string()))
}

fn save_payload(state: &AppState, payload: ProductPayload) -> Result<Json<ProductPayload>, (StatusCode, String)> {
    if !state.store.save_payload(&payload) {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save product details".to_string(),
        ));
    }
    Ok(Json(payload))
}

/// GET /payload - The last submitted product details
#[utoipa::path(
    get,
    path = "/payload",
    responses(
        (status = 200, description = "The stored product payload"),
        (status = 404, description = "Nothing submitted yet")
    )
)]
pub async fn get_payload_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    stored_payload(&state).map(Json)
}

/// PUT /payload - Edit the stored product details from the summary card
#[utoipa::path(
    put,
    path = "/payload",
    request_body = PayloadRequest,
    responses(
        (status = 200, description = "The updated payload"),
        (status = 404, description = "Nothing submitted yet")
    )
)]
pub async fn update_payload_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PayloadRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut payload = stored_payload(&state)?;
    payload.apply(req.into());
    save_payload(&state, payload)
}

/// GET /payload/summary - Audience, CTA and interest hints for the stored product
#[utoipa::path(
    get,
    path = "/payload/summary",
    responses(
        (status = 200, description = "Derived hints", body = SummaryResponse),
        (status = 404, description = "Nothing submitted yet")
    )
)]
pub async fn payload_summary_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let summary = PayloadSummary::of(&stored_payload(&state)?);
    Ok(Json(SummaryResponse {
        platform: state.store.selected_platform(),
        audience: summary.audience,
        cta: summary.cta,
        age_range: summary.age_range,
        audience_tags: summary.audience_tags,
        interests: summary.interests,
    }))
}

/// PUT /payload/price - Edit the price on the summary screen
#[utoipa::path(
    put,
    path = "/payload/price",
    request_body = PriceUpdate,
    responses(
        (status = 200, description = "The updated payload"),
        (status = 404, description = "Nothing submitted yet")
    )
)]
pub async fn update_price_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PriceUpdate>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut payload = stored_payload(&state)?;
    match req {
        PriceUpdate::Single { price } => payload.set_price(price),
        PriceUpdate::Range { min, max } => payload.set_price_range(min, max),
    }
    save_payload(&state, payload)
}

/// GET /platform - The platform campaigns are generated for
#[utoipa::path(
    get,
    path = "/platform",
    responses((status = 200, description = "The selected platform", body = PlatformBody))
)]
pub async fn get_platform_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(PlatformBody {
        platform: state.store.selected_platform(),
    })
}

/// PUT /platform - Select the platform
#[utoipa::path(
    put,
    path = "/platform",
    request_body = PlatformBody,
    responses((status = 200, description = "Platform saved", body = PlatformBody))
)]
pub async fn set_platform_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlatformBody>,
) -> impl IntoResponse {
    state.store.save_platform(req.platform);
    Json(req)
}

/// GET /preferences/theme
#[utoipa::path(
    get,
    path = "/preferences/theme",
    responses((status = 200, description = "The theme preference", body = ThemeBody))
)]
pub async fn get_theme_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ThemeBody {
        theme: state.store.theme(),
    })
}

/// PUT /preferences/theme
#[utoipa::path(
    put,
    path = "/preferences/theme",
    request_body = ThemeBody,
    responses((status = 200, description = "Theme saved", body = ThemeBody))
)]
pub async fn set_theme_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ThemeBody>,
) -> impl IntoResponse {
    state.store.save_theme(req.theme);
    Json(req)
}
