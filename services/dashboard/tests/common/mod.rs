//! Shared fixtures: a stub of the remote backend, served on an ephemeral port.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use dashboard_lib::config::Config;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TOKEN: &str = "tok-1";
pub const PASSWORD: &str = "secret1";

/// Behaviour switches and a log of what the stub received.
#[derive(Default)]
pub struct Backend {
    pub requests: Mutex<Vec<String>>,
    pub suggestions_down: Mutex<bool>,
    pub publish_failures: Mutex<u32>,
    pub last_campaign: Mutex<Option<Value>>,
}

impl Backend {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, entry: impl Into<String>) {
        self.requests.lock().unwrap().push(entry.into());
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn detail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": message })))
}

async fn suggestions(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.record(format!("suggestions:{}", body["platform"].as_str().unwrap_or("")));
    if *backend.suggestions_down.lock().unwrap() {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Error generating suggestions");
    }
    let cta = if body["price"].is_string() || body["price_range"].is_string() {
        "Shop Now"
    } else {
        "Learn More"
    };
    (
        StatusCode::OK,
        Json(json!({
            "headlines": ["Fresh Fits For Every Day", "Style That Moves With You", "Comfort Meets Class"],
            "descriptions": ["Breathable cotton.", "Tailored for Jaipur summers.", "Free returns."],
            "keywords": ["cotton", "summer wear"],
            "image_prompts": ["a model in a cotton shirt"],
            "cta": cta,
            "total_matches": 12
        })),
    )
}

async fn login(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    backend.record("login");
    if body["password"] == PASSWORD {
        (StatusCode::OK, Json(json!({ "access_token": TOKEN, "token_type": "bearer" })))
    } else {
        detail(StatusCode::UNAUTHORIZED, "Incorrect email or password")
    }
}

async fn register(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    backend.record("register");
    if body["email"] == "taken@example.com" {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    (StatusCode::CREATED, Json(json!({ "access_token": TOKEN, "token_type": "bearer" })))
}

async fn create_campaign(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.record(format!("create:{}", body["status"].as_str().unwrap_or("")));
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    *backend.last_campaign.lock().unwrap() = Some(body);
    (StatusCode::CREATED, Json(json!({ "_id": "camp-42", "status": "draft" })))
}

async fn publish_campaign(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    backend.record(format!("publish:{}", id));
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    let mut failures = backend.publish_failures.lock().unwrap();
    if *failures > 0 {
        *failures -= 1;
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({})));
    }
    (StatusCode::OK, Json(json!({ "id": id, "status": "active" })))
}

/// Serves `app` on 127.0.0.1 with an OS-assigned port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Starts the stub backend and returns its URL with a handle on its state.
pub async fn start_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/generate-suggestions", post(suggestions))
        .route("/api/auth/login/json", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/campaigns", post(create_campaign))
        .route("/api/campaigns/{id}/publish", post(publish_campaign))
        .with_state(backend.clone());
    (serve(app).await, backend)
}

/// A configuration pointing at `api_url`, storing under `dir`, with no submit delay.
pub fn test_config(api_url: &str, dir: &std::path::Path) -> Config {
    Config {
        api_url: api_url.to_string(),
        store_path: dir.join("store.json"),
        request_timeout: Duration::from_secs(5),
        submit_delay: Duration::ZERO,
        ..Config::default()
    }
}
