//! services/dashboard/src/web/rest.rs
//!
//! Contains the health endpoint and the master definition for the OpenAPI
//! specification.

use crate::web::{accounts, auth, preferences, review, wizard};
use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        wizard::create_wizard_handler,
        wizard::get_wizard_handler,
        wizard::delete_wizard_handler,
        wizard::update_field_handler,
        wizard::next_step_handler,
        wizard::previous_step_handler,
        wizard::submit_handler,
        wizard::location_suggestions_handler,
        wizard::add_location_handler,
        wizard::remove_location_handler,
        preferences::get_payload_handler,
        preferences::update_payload_handler,
        preferences::payload_summary_handler,
        preferences::update_price_handler,
        preferences::get_platform_handler,
        preferences::set_platform_handler,
        preferences::get_theme_handler,
        preferences::set_theme_handler,
        review::generate_campaign_handler,
        review::get_campaign_handler,
        review::update_meta_handler,
        review::update_adset_handler,
        review::update_creative_handler,
        review::regenerate_handler,
        review::select_option_handler,
        review::regenerate_all_handler,
        review::publish_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::session_handler,
        accounts::list_accounts_handler,
        accounts::connect_demo_account_handler,
        accounts::disconnect_account_handler,
    ),
    components(
        schemas(
            HealthResponse,
            wizard::WizardView,
            wizard::FieldUpdate,
            wizard::NextResponse,
            wizard::LocationRequest,
            preferences::PlatformBody,
            preferences::ThemeBody,
            preferences::PriceUpdate,
            preferences::PayloadRequest,
            preferences::SummaryResponse,
            review::ReviewView,
            review::RegenerateRequest,
            review::RegenerateResponse,
            review::SelectRequest,
            review::MetaRequest,
            review::AdSetRequest,
            review::CreativeRequest,
            review::PublishResponse,
            auth::SignupRequest,
            auth::LoginRequest,
            auth::SessionResponse,
        )
    ),
    tags(
        (name = "AdPatterns Dashboard API", description = "Product intake, campaign review and publishing.")
    )
)]
pub struct ApiDoc;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "The service is up", body = HealthResponse))
)]
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
