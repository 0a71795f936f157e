//! services/dashboard/src/adapters/suggestions.rs
//!
//! This module contains the adapter for the ad-copy generation endpoint.
//! It implements the `SuggestionService` port from the `core` crate.

use crate::adapters::backend::{decode, transport, BackendClient};
use adpatterns_core::{
    domain::{SuggestionCriteria, SuggestionResult},
    ports::{PortResult, SuggestionService},
};
use async_trait::async_trait;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SuggestionService` against `POST /api/generate-suggestions`.
#[derive(Clone)]
pub struct HttpSuggestionAdapter {
    backend: BackendClient,
}

impl HttpSuggestionAdapter {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

//=========================================================================================
// `SuggestionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SuggestionService for HttpSuggestionAdapter {
    async fn generate_suggestions(
        &self,
        criteria: &SuggestionCriteria,
    ) -> PortResult<SuggestionResult> {
        debug!("Requesting suggestions for category '{}'", criteria.category);
        let response = self
            .backend
            .client()
            .post(self.backend.url("/api/generate-suggestions"))
            .json(criteria)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}
