//! services/dashboard/src/web/auth.rs
//!
//! Authentication endpoints for signup, login and logout. Credentials are
//! checked by the remote backend; the access token it returns is kept in the
//! local store and attached to campaign requests.

use crate::web::state::AppState;
use adpatterns_core::account::{self, AuthError};
use adpatterns_core::ports::Registration;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub email: Option<String>,
}

fn auth_error(e: AuthError) -> (StatusCode, String) {
    match e {
        AuthError::Invalid(message) => (StatusCode::BAD_REQUEST, message.to_string()),
        AuthError::Rejected(message) => {
            warn!("Backend refused credentials: {}", message);
            (StatusCode::UNAUTHORIZED, message)
        }
        AuthError::Unsaved => (StatusCode::INTERNAL_SERVER_ERROR, AuthError::Unsaved.to_string()),
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create an account on the backend
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = SessionResponse),
        (status = 400, description = "Missing fields or short password"),
        (status = 401, description = "Refused by the backend"),
        (status = 500, description = "The session could not be stored")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let registration = Registration {
        full_name: req.full_name,
        email: req.email,
        phone_number: req.phone_number,
        password: req.password,
    };
    account::register(state.auth.as_ref(), &state.store, &registration)
        .await
        .map_err(auth_error)?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            authenticated: true,
            email: state.store.user_email(),
        }),
    ))
}

/// POST /auth/login - Sign in with an existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "The session could not be stored")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    account::login(state.auth.as_ref(), &state.store, &req.email, &req.password)
        .await
        .map_err(auth_error)?;
    Ok(Json(SessionResponse {
        authenticated: true,
        email: state.store.user_email(),
    }))
}

/// POST /auth/logout - Forget the stored token
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Signed out", body = SessionResponse))
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    account::logout(&state.store);
    Json(SessionResponse {
        authenticated: false,
        email: None,
    })
}

/// GET /auth/session - Whether a token is stored
#[utoipa::path(
    get,
    path = "/auth/session",
    responses((status = 200, description = "The current session", body = SessionResponse))
)]
pub async fn session_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let authenticated = state.store.auth_token().is_some();
    Json(SessionResponse {
        authenticated,
        email: state.store.user_email().filter(|_| authenticated),
    })
}
