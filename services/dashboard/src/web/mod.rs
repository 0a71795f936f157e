pub mod accounts;
pub mod auth;
pub mod preferences;
pub mod rest;
pub mod review;
pub mod state;
pub mod wizard;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

pub use rest::ApiDoc;
pub use state::AppState;

/// Builds every dashboard route over the shared state.
pub fn router(app_state: Arc<AppState>) -> Router {
    let wizard_routes = Router::new()
        .route("/wizard", post(wizard::create_wizard_handler))
        .route(
            "/wizard/{id}",
            get(wizard::get_wizard_handler).delete(wizard::delete_wizard_handler),
        )
        .route("/wizard/{id}/fields", put(wizard::update_field_handler))
        .route("/wizard/{id}/next", post(wizard::next_step_handler))
        .route("/wizard/{id}/previous", post(wizard::previous_step_handler))
        .route("/wizard/{id}/submit", post(wizard::submit_handler))
        .route(
            "/wizard/{id}/locations",
            get(wizard::location_suggestions_handler).post(wizard::add_location_handler),
        )
        .route(
            "/wizard/{id}/locations/{area}",
            delete(wizard::remove_location_handler),
        );

    let campaign_routes = Router::new()
        .route("/campaign", get(review::get_campaign_handler))
        .route("/campaign/generate", post(review::generate_campaign_handler))
        .route("/campaign/meta", put(review::update_meta_handler))
        .route("/campaign/adset", put(review::update_adset_handler))
        .route("/campaign/creative", put(review::update_creative_handler))
        .route("/campaign/regenerate", post(review::regenerate_handler))
        .route("/campaign/select", post(review::select_option_handler))
        .route("/campaign/regenerate-all", post(review::regenerate_all_handler))
        .route("/campaign/publish", post(review::publish_handler));

    let settings_routes = Router::new()
        .route(
            "/payload",
            get(preferences::get_payload_handler).put(preferences::update_payload_handler),
        )
        .route("/payload/summary", get(preferences::payload_summary_handler))
        .route("/payload/price", put(preferences::update_price_handler))
        .route(
            "/platform",
            get(preferences::get_platform_handler).put(preferences::set_platform_handler),
        )
        .route(
            "/preferences/theme",
            get(preferences::get_theme_handler).put(preferences::set_theme_handler),
        )
        .route("/accounts", get(accounts::list_accounts_handler))
        .route("/accounts/demo", post(accounts::connect_demo_account_handler))
        .route("/accounts/{id}", delete(accounts::disconnect_account_handler));

    let auth_routes = Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/session", get(auth::session_handler));

    Router::new()
        .route("/health", get(rest::health_handler))
        .merge(wizard_routes)
        .merge(campaign_routes)
        .merge(settings_routes)
        .merge(auth_routes)
        .with_state(app_state)
}
