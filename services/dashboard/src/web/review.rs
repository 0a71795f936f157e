//! services/dashboard/src/web/review.rs
//!
//! The campaign review screen: generating the draft, editing it, asking for
//! fresh copy, and publishing.

use crate::web::preferences::NO_PAYLOAD_MESSAGE;
use crate::web::state::{AppState, NO_CAMPAIGN_MESSAGE};
use adpatterns_core::draft::generate_draft;
use adpatterns_core::review::{CreativeUpdate, MetaUpdate, DASHBOARD_ROUTE, REDIRECT_DELAY_MS};
use adpatterns_core::suggestions::CTA_OPTIONS;
use adpatterns_core::{
    AdSet, CampaignDraft, CopyKind, Notification, PublishError, PublishState, Regenerated,
    ReviewSession, SystemRandom,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// Everything the review screen renders.
#[derive(Serialize, ToSchema)]
pub struct ReviewView {
    #[schema(value_type = Object)]
    pub draft: CampaignDraft,
    pub headline_options: Vec<String>,
    pub description_options: Vec<String>,
    pub cta_options: Vec<String>,
    #[schema(value_type = Object)]
    pub publish_state: PublishState,
    /// Toasts raised since the previous response.
    #[schema(value_type = Vec<Object>)]
    pub notifications: Vec<Notification>,
}

impl ReviewView {
    fn of(session: &mut ReviewSession) -> Self {
        let notifications = session.take_notifications();
        Self {
            draft: session.draft().clone(),
            headline_options: session.editor().headline_options().to_vec(),
            description_options: session.editor().description_options().to_vec(),
            cta_options: CTA_OPTIONS.iter().map(|c| c.to_string()).collect(),
            publish_state: session.publish_state().clone(),
            notifications,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct RegenerateRequest {
    /// `headline` or `description`.
    #[schema(value_type = String)]
    pub kind: CopyKind,
}

#[derive(Serialize, ToSchema)]
pub struct RegenerateResponse {
    /// `added`, `exhausted` or `unavailable`.
    pub outcome: String,
    pub option: Option<String>,
    pub review: ReviewView,
}

#[derive(Deserialize, ToSchema)]
pub struct SelectRequest {
    #[schema(value_type = String)]
    pub kind: CopyKind,
    pub index: usize,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaRequest {
    pub campaign_name: Option<String>,
    pub objective: Option<String>,
    pub budget_daily: Option<String>,
}

impl From<MetaRequest> for MetaUpdate {
    fn from(req: MetaRequest) -> Self {
        Self {
            campaign_name: req.campaign_name,
            objective: req.objective,
            budget_daily: req.budget_daily,
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdSetRequest {
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

impl From<AdSetRequest> for AdSet {
    fn from(req: AdSetRequest) -> Self {
        Self {
            age_min: req.age_min,
            age_max: req.age_max,
            gender: req.gender,
            location: req.location,
            interests: req.interests,
            keywords: req.keywords,
            url: req.url,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreativeRequest {
    pub headline: Option<String>,
    pub description: Option<String>,
    /// Must be one of the listed call-to-action options.
    pub cta: Option<String>,
    pub image: Option<String>,
    /// Attach a placeholder AI image instead of `image`.
    #[serde(default)]
    pub simulate_image: bool,
}

impl From<CreativeRequest> for CreativeUpdate {
    fn from(req: CreativeRequest) -> Self {
        Self {
            headline: req.headline,
            description: req.description,
            cta: req.cta,
            image: req.image,
            simulate_image: req.simulate_image,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PublishResponse {
    pub campaign_id: String,
    pub message: String,
    /// Where the client should navigate, after `redirect_after_ms`.
    pub redirect_to: String,
    pub redirect_after_ms: u64,
}

fn no_campaign() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, NO_CAMPAIGN_MESSAGE.to_string())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /campaign/generate - Build a fresh draft from the stored product details
#[utoipa::path(
    post,
    path = "/campaign/generate",
    responses(
        (status = 201, description = "Draft generated", body = ReviewView),
        (status = 404, description = "No product details submitted")
    )
)]
pub async fn generate_campaign_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let payload = state
        .store
        .last_payload()
        .ok_or_else(|| (StatusCode::NOT_FOUND, NO_PAYLOAD_MESSAGE.to_string()))?;
    let platform = state.store.selected_platform();

    let draft = generate_draft(state.suggestions.as_ref(), &state.store, &payload, platform).await;
    let mut session = ReviewSession::new(draft, state.store.clone(), Box::new(SystemRandom));
    let view = ReviewView::of(&mut session);
    *state.review.lock().await = Some(session);
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /campaign - The draft under review
#[utoipa::path(
    get,
    path = "/campaign",
    responses(
        (status = 200, description = "The draft under review", body = ReviewView),
        (status = 404, description = "No campaign generated yet")
    )
)]
pub async fn get_campaign_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut review = state.review_session().await?;
    let session = review.as_mut().ok_or_else(no_campaign)?;
    Ok(Json(ReviewView::of(session)))
}

/// PUT /campaign/meta - Edit the name, objective or daily budget
#[utoipa::path(
    put,
    path = "/campaign/meta",
    request_body = MetaRequest,
    responses(
        (status = 200, description = "Draft updated", body = ReviewView),
        (status = 404, description = "No campaign generated yet")
    )
)]
pub async fn update_meta_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MetaRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut review = state.review_session().await?;
    let session = review.as_mut().ok_or_else(no_campaign)?;
    session.update_meta(req.into());
    Ok(Json(ReviewView::of(session)))
}

/// PUT /campaign/adset - Replace the audience targeting
#[utoipa::path(
    put,
    path = "/campaign/adset",
    request_body = AdSetRequest,
    responses(
        (status = 200, description = "Draft updated", body = ReviewView),
        (status = 400, description = "Minimum age above maximum age"),
        (status = 404, description = "No campaign generated yet")
    )
)]
pub async fn update_adset_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdSetRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.age_min > req.age_max {
        return Err((
            StatusCode::BAD_REQUEST,
            "Minimum age cannot exceed maximum age".to_string(),
        ));
    }
    let mut review = state.review_session().await?;
    let session = review.as_mut().ok_or_else(no_campaign)?;
    session.update_adset(req.into());
    Ok(Json(ReviewView::of(session)))
}

/// PUT /campaign/creative - Edit the ad copy, CTA or image
#[utoipa::path(
    put,
    path = "/campaign/creative",
    request_body = CreativeRequest,
    responses(
        (status = 200, description = "Draft updated", body = ReviewView),
        (status = 404, description = "No campaign generated yet"),
        (status = 422, description = "Unknown call to action")
    )
)]
pub async fn update_creative_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreativeRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Some(cta) = &req.cta {
        if !CTA_OPTIONS.contains(&cta.as_str()) {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("'{}' is not an available call to action", cta),
            ));
        }
    }
    let mut review = state.review_session().await?;
    let session = review.as_mut().ok_or_else(no_campaign)?;
    session.update_creative(req.into());
    Ok(Json(ReviewView::of(session)))
}

/// POST /campaign/regenerate - Offer one more unseen headline or description
#[utoipa::path(
    post,
    path = "/campaign/regenerate",
    request_body = RegenerateRequest,
    responses(
        (status = 200, description = "Outcome and the updated options", body = RegenerateResponse),
        (status = 404, description = "No campaign generated yet")
    )
)]
pub async fn regenerate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegenerateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut review = state.review_session().await?;
    let session = review.as_mut().ok_or_else(no_campaign)?;
    let (outcome, option) = match session.regenerate(req.kind, state.suggestions.as_ref()).await {
        Regenerated::Added(option) => ("added", Some(option)),
        Regenerated::Exhausted => ("exhausted", None),
        Regenerated::Unavailable => ("unavailable", None),
    };
    Ok(Json(RegenerateResponse {
        outcome: outcome.to_string(),
        option,
        review: ReviewView::of(session),
    }))
}

/// POST /campaign/select - Use an offered option in the creative
#[utoipa::path(
    post,
    path = "/campaign/select",
    request_body = SelectRequest,
    responses(
        (status = 200, description = "Draft updated", body = ReviewView),
        (status = 404, description = "No campaign, or no option at that index")
    )
)]
pub async fn select_option_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut review = state.review_session().await?;
    let session = review.as_mut().ok_or_else(no_campaign)?;
    if session.select_option(req.kind, req.index).is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            format!("No option at index {}", req.index),
        ));
    }
    Ok(Json(ReviewView::of(session)))
}

/// POST /campaign/regenerate-all - Refresh headline, description, CTA and keywords
///
/// A failed fetch keeps the current draft and reports an error notification.
#[utoipa::path(
    post,
    path = "/campaign/regenerate-all",
    responses(
        (status = 200, description = "Draft after the attempt", body = ReviewView),
        (status = 404, description = "No campaign generated yet")
    )
)]
pub async fn regenerate_all_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut review = state.review_session().await?;
    let session = review.as_mut().ok_or_else(no_campaign)?;
    session.regenerate_all(state.suggestions.as_ref()).await;
    Ok(Json(ReviewView::of(session)))
}

/// POST /campaign/publish - Create the campaign on the backend and publish it
#[utoipa::path(
    post,
    path = "/campaign/publish",
    responses(
        (status = 200, description = "Published", body = PublishResponse),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "No campaign generated yet"),
        (status = 409, description = "Already published"),
        (status = 502, description = "The backend refused the campaign")
    )
)]
pub async fn publish_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut review = state.review_session().await?;
    let session = review.as_mut().ok_or_else(no_campaign)?;

    let campaign_id = session
        .publish(state.campaigns.as_ref())
        .await
        .map_err(|e| {
            let status = match e {
                PublishError::Unauthenticated => StatusCode::UNAUTHORIZED,
                PublishError::AlreadyPublished => StatusCode::CONFLICT,
                PublishError::CreateFailed(_) | PublishError::PublishFailed(_) => {
                    StatusCode::BAD_GATEWAY
                }
            };
            (status, e.to_string())
        })?;
    // The toast is carried by the response message instead.
    session.take_notifications();
    info!("Campaign {} is live", campaign_id);

    Ok(Json(PublishResponse {
        campaign_id,
        message: "Campaign Published Successfully!".to_string(),
        redirect_to: DASHBOARD_ROUTE.to_string(),
        redirect_after_ms: REDIRECT_DELAY_MS,
    }))
}
