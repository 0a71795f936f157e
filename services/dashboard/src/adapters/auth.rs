//! services/dashboard/src/adapters/auth.rs
//!
//! This module contains the adapter for the backend's account endpoints.
//! It implements the `AuthService` port from the `core` crate.

use crate::adapters::backend::{decode, transport, BackendClient};
use adpatterns_core::ports::{AuthService, PortResult, Registration};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenBody {
    access_token: String,
}

/// An adapter that implements `AuthService` against `/api/auth/*`.
#[derive(Clone)]
pub struct HttpAuthAdapter {
    backend: BackendClient,
}

impl HttpAuthAdapter {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AuthService for HttpAuthAdapter {
    async fn login(&self, email: &str, password: &str) -> PortResult<String> {
        let response = self
            .backend
            .client()
            .post(self.backend.url("/api/auth/login/json"))
            .json(&LoginBody { email, password })
            .send()
            .await
            .map_err(transport)?;
        let body: TokenBody = decode(response).await?;
        Ok(body.access_token)
    }

    async fn register(&self, registration: &Registration) -> PortResult<String> {
        let response = self
            .backend
            .client()
            .post(self.backend.url("/api/auth/register"))
            .json(registration)
            .send()
            .await
            .map_err(transport)?;
        let body: TokenBody = decode(response).await?;
        Ok(body.access_token)
    }
}
