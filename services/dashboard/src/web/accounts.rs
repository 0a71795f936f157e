//! services/dashboard/src/web/accounts.rs
//!
//! Connected ad accounts. Connecting is simulated with demo data.

use crate::web::state::AppState;
use adpatterns_core::account::{connect_demo_account, disconnect_account, list_accounts};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// GET /accounts - List connected ad accounts
#[utoipa::path(
    get,
    path = "/accounts",
    responses((status = 200, description = "Connected accounts, newest first"))
)]
pub async fn list_accounts_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(list_accounts(&state.store))
}

/// POST /accounts/demo - Connect a demo Meta Business account
#[utoipa::path(
    post,
    path = "/accounts/demo",
    responses((status = 201, description = "Account connected"))
)]
pub async fn connect_demo_account_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let accounts = connect_demo_account(&state.store, Utc::now());
    if let Some(account) = accounts.first() {
        info!("Connected demo account {}", account.id);
    }
    (StatusCode::CREATED, Json(accounts))
}

/// DELETE /accounts/{id} - Disconnect an account
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    params(("id" = String, Path, description = "The account id.")),
    responses((status = 200, description = "Remaining accounts"))
)]
pub async fn disconnect_account_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    Json(disconnect_account(&state.store, &id))
}
