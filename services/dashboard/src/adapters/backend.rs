//! services/dashboard/src/adapters/backend.rs
//!
//! The shared HTTP client for the remote backend, and the mapping of its
//! failure responses onto `PortError`.

use adpatterns_core::ports::{PortError, PortResult};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// A `reqwest::Client` bound to the backend's base URL. Cheap to clone.
#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// The error body FastAPI-style backends send: `{"detail": "..."}`.
/// Validation errors carry a list instead of a string.
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

pub(crate) fn transport(e: reqwest::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Turns a non-success response into a `PortError`, keeping the server's message.
pub(crate) async fn rejection(response: Response) -> PortError {
    let status = response.status();
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| match body.detail {
            serde_json::Value::String(detail) => Some(detail),
            serde_json::Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(|m| m.as_str()).map(str::to_string)),
            _ => None,
        })
        .filter(|detail| !detail.trim().is_empty());

    match (detail, status) {
        (Some(detail), _) => PortError::Rejected(detail),
        (None, StatusCode::UNAUTHORIZED) => PortError::Unauthorized,
        (None, StatusCode::NOT_FOUND) => PortError::NotFound(status.to_string()),
        (None, status) => PortError::Unexpected(format!("backend responded with {}", status)),
    }
}

/// Decodes a success body, or maps a failure response.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> PortResult<T> {
    if !response.status().is_success() {
        return Err(rejection(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| PortError::Unexpected(format!("malformed backend response: {}", e)))
}
