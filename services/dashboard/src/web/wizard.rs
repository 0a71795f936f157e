//! services/dashboard/src/web/wizard.rs
//!
//! Endpoints driving the multi-step product intake form. Each wizard lives in
//! memory under a generated id until it is deleted.

use crate::web::state::AppState;
use adpatterns_core::{FormError, NextOutcome, ProductForm};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// A snapshot of one wizard, enough to render the current step.
#[derive(Serialize, ToSchema)]
pub struct WizardView {
    pub id: Uuid,
    pub current_step: usize,
    pub steps: Vec<String>,
    /// `right` after moving forward, `left` after moving back.
    pub direction: String,
    pub form_data: BTreeMap<String, String>,
    pub errors: BTreeMap<String, String>,
    pub selected_locations: Vec<String>,
    pub is_submitting: bool,
    pub is_complete: bool,
}

impl WizardView {
    fn of(id: Uuid, form: &ProductForm) -> Self {
        let direction = serde_json::to_value(form.direction())
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        Self {
            id,
            current_step: form.current_step(),
            steps: form.steps().iter().map(|s| s.label.to_string()).collect(),
            direction,
            form_data: form.form_data().clone(),
            errors: form.errors().clone(),
            selected_locations: form.selected_locations(),
            is_submitting: form.is_submitting(),
            is_complete: form.is_complete(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct FieldUpdate {
    pub field: String,
    pub value: String,
}

#[derive(Serialize, ToSchema)]
pub struct NextResponse {
    /// One of `advanced`, `blocked`, `submit_required` or `finished`.
    pub outcome: String,
    pub wizard: WizardView,
}

#[derive(Deserialize, IntoParams)]
pub struct LocationQuery {
    /// Case-insensitive fragment of an area name.
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LocationRequest {
    pub area: String,
}

fn wizard_not_found(id: Uuid) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Wizard {} not found", id))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /wizard - Start a new product wizard
#[utoipa::path(
    post,
    path = "/wizard",
    responses((status = 201, description = "Wizard created", body = WizardView))
)]
pub async fn create_wizard_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let id = Uuid::new_v4();
    let form = ProductForm::new();
    let view = WizardView::of(id, &form);
    state.wizards.lock().await.insert(id, form);
    info!("Started wizard {}", id);
    (StatusCode::CREATED, Json(view))
}

/// GET /wizard/{id} - Read a wizard
#[utoipa::path(
    get,
    path = "/wizard/{id}",
    params(("id" = Uuid, Path, description = "The wizard id.")),
    responses(
        (status = 200, description = "Current wizard state", body = WizardView),
        (status = 404, description = "Unknown wizard")
    )
)]
pub async fn get_wizard_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let wizards = state.wizards.lock().await;
    let form = wizards.get(&id).ok_or_else(|| wizard_not_found(id))?;
    Ok(Json(WizardView::of(id, form)))
}

/// DELETE /wizard/{id} - Discard a wizard
#[utoipa::path(
    delete,
    path = "/wizard/{id}",
    params(("id" = Uuid, Path, description = "The wizard id.")),
    responses(
        (status = 204, description = "Wizard discarded"),
        (status = 404, description = "Unknown wizard")
    )
)]
pub async fn delete_wizard_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .wizards
        .lock()
        .await
        .remove(&id)
        .ok_or_else(|| wizard_not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /wizard/{id}/fields - Set one form field
#[utoipa::path(
    put,
    path = "/wizard/{id}/fields",
    params(("id" = Uuid, Path, description = "The wizard id.")),
    request_body = FieldUpdate,
    responses(
        (status = 200, description = "Field updated", body = WizardView),
        (status = 404, description = "Unknown wizard")
    )
)]
pub async fn update_field_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<FieldUpdate>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut wizards = state.wizards.lock().await;
    let form = wizards.get_mut(&id).ok_or_else(|| wizard_not_found(id))?;
    form.update_form_data(&req.field, &req.value);
    Ok(Json(WizardView::of(id, form)))
}

/// POST /wizard/{id}/next - Validate the current step and move forward
#[utoipa::path(
    post,
    path = "/wizard/{id}/next",
    params(("id" = Uuid, Path, description = "The wizard id.")),
    responses(
        (status = 200, description = "Outcome of the transition", body = NextResponse),
        (status = 404, description = "Unknown wizard")
    )
)]
pub async fn next_step_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut wizards = state.wizards.lock().await;
    let form = wizards.get_mut(&id).ok_or_else(|| wizard_not_found(id))?;
    let outcome = match form.handle_next() {
        NextOutcome::Advanced => "advanced",
        NextOutcome::Blocked => "blocked",
        NextOutcome::SubmitRequired => "submit_required",
        NextOutcome::Finished => "finished",
    };
    Ok(Json(NextResponse {
        outcome: outcome.to_string(),
        wizard: WizardView::of(id, form),
    }))
}

/// POST /wizard/{id}/previous - Move back one step
#[utoipa::path(
    post,
    path = "/wizard/{id}/previous",
    params(("id" = Uuid, Path, description = "The wizard id.")),
    responses(
        (status = 200, description = "Wizard after moving back", body = WizardView),
        (status = 404, description = "Unknown wizard")
    )
)]
pub async fn previous_step_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut wizards = state.wizards.lock().await;
    let form = wizards.get_mut(&id).ok_or_else(|| wizard_not_found(id))?;
    form.handle_previous();
    Ok(Json(WizardView::of(id, form)))
}

/// POST /wizard/{id}/submit - Persist the product details and finish the wizard
///
/// The payload is saved immediately; the confirmation step is reached after
/// the configured delay. Invalid fields answer 422 with the errors filled in.
#[utoipa::path(
    post,
    path = "/wizard/{id}/submit",
    params(("id" = Uuid, Path, description = "The wizard id.")),
    responses(
        (status = 200, description = "Submitted; the wizard is complete and closed", body = WizardView),
        (status = 404, description = "Unknown wizard"),
        (status = 409, description = "Not on the review step, or already submitting"),
        (status = 422, description = "Validation failed", body = WizardView)
    )
)]
pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    {
        let mut wizards = state.wizards.lock().await;
        let form = wizards.get_mut(&id).ok_or_else(|| wizard_not_found(id))?;
        match form.begin_submit(&state.store) {
            Ok(_) => {}
            Err(FormError::Invalid(_)) => {
                return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(WizardView::of(id, form))));
            }
            Err(e) => return Err((StatusCode::CONFLICT, e.to_string())),
        }
    }

    // The lock is released while waiting so the wizard stays readable.
    tokio::time::sleep(state.config.submit_delay).await;

    let mut wizards = state.wizards.lock().await;
    let form = wizards.get_mut(&id).ok_or_else(|| wizard_not_found(id))?;
    if let Err(e) = form.complete_submit() {
        warn!("Wizard {} could not complete its submission: {}", id, e);
        return Err((StatusCode::CONFLICT, e.to_string()));
    }
    let view = WizardView::of(id, form);
    // A submitted wizard has nothing left to edit; its payload lives in the store.
    wizards.remove(&id);
    info!("Wizard {} submitted and closed", id);
    Ok((StatusCode::OK, Json(view)))
}

/// GET /wizard/{id}/locations - Suggest audience areas
#[utoipa::path(
    get,
    path = "/wizard/{id}/locations",
    params(("id" = Uuid, Path, description = "The wizard id."), LocationQuery),
    responses(
        (status = 200, description = "Matching areas not selected yet", body = Vec<String>),
        (status = 404, description = "Unknown wizard")
    )
)]
pub async fn location_suggestions_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<LocationQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let wizards = state.wizards.lock().await;
    let form = wizards.get(&id).ok_or_else(|| wizard_not_found(id))?;
    let areas: Vec<String> = form
        .location_suggestions(query.q.trim())
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(Json(areas))
}

/// POST /wizard/{id}/locations - Add an audience area
#[utoipa::path(
    post,
    path = "/wizard/{id}/locations",
    params(("id" = Uuid, Path, description = "The wizard id.")),
    request_body = LocationRequest,
    responses(
        (status = 200, description = "Area added", body = WizardView),
        (status = 404, description = "Unknown wizard")
    )
)]
pub async fn add_location_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<LocationRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let area = req.area.trim();
    if area.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Area cannot be empty".to_string()));
    }
    let mut wizards = state.wizards.lock().await;
    let form = wizards.get_mut(&id).ok_or_else(|| wizard_not_found(id))?;
    form.add_location(area);
    Ok(Json(WizardView::of(id, form)))
}

/// DELETE /wizard/{id}/locations/{area} - Remove an audience area
#[utoipa::path(
    delete,
    path = "/wizard/{id}/locations/{area}",
    params(
        ("id" = Uuid, Path, description = "The wizard id."),
        ("area" = String, Path, description = "The area to remove.")
    ),
    responses(
        (status = 200, description = "Area removed", body = WizardView),
        (status = 404, description = "Unknown wizard")
    )
)]
pub async fn remove_location_handler(
    State(state): State<Arc<AppState>>,
    Path((id, area)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut wizards = state.wizards.lock().await;
    let form = wizards.get_mut(&id).ok_or_else(|| wizard_not_found(id))?;
    form.remove_location(&area);
    Ok(Json(WizardView::of(id, form)))
}
