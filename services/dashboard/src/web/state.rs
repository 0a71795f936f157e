//! services/dashboard/src/web/state.rs
//!
//! Defines the application's shared state and the per-wizard sessions it holds.

use crate::adapters::{
    BackendClient, HttpAuthAdapter, HttpCampaignAdapter, HttpSuggestionAdapter, JsonFileStore,
};
use crate::config::Config;
use crate::error::ApiError;
use adpatterns_core::ports::{AuthService, CampaignService, SuggestionService};
use adpatterns_core::{DraftStore, ProductForm, ReviewSession, SystemRandom};
use axum::http::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;
use uuid::Uuid;

pub const NO_CAMPAIGN_MESSAGE: &str = "No generated campaign found. Generate a campaign first.";

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub config: Arc<Config>,
    pub suggestions: Arc<dyn SuggestionService>,
    pub campaigns: Arc<dyn CampaignService>,
    pub auth: Arc<dyn AuthService>,
    pub store: DraftStore,
    /// Open product wizards, keyed by the id handed to the client.
    pub wizards: Mutex<HashMap<Uuid, ProductForm>>,
    /// The campaign under review. Loaded lazily from the store.
    pub review: Mutex<Option<ReviewSession>>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        suggestions: Arc<dyn SuggestionService>,
        campaigns: Arc<dyn CampaignService>,
        auth: Arc<dyn AuthService>,
        store: DraftStore,
    ) -> Self {
        Self {
            config,
            suggestions,
            campaigns,
            auth,
            store,
            wizards: Mutex::new(HashMap::new()),
            review: Mutex::new(None),
        }
    }

    /// Wires the HTTP adapters and the file store described by `config`.
    pub fn from_config(config: Arc<Config>) -> Result<Self, ApiError> {
        let backend = BackendClient::new(config.api_url.clone(), config.request_timeout)?;
        let store = DraftStore::new(Arc::new(JsonFileStore::open(config.store_path.clone())));
        info!("Using backend at {}", config.api_url);

        Ok(Self::new(
            config,
            Arc::new(HttpSuggestionAdapter::new(backend.clone())),
            Arc::new(HttpCampaignAdapter::new(backend.clone())),
            Arc::new(HttpAuthAdapter::new(backend)),
            store,
        ))
    }

    /// Locks the review slot, opening the stored draft if nothing is loaded yet.
    pub async fn review_session(
        &self,
    ) -> Result<MutexGuard<'_, Option<ReviewSession>>, (StatusCode, String)> {
        let mut review = self.review.lock().await;
        if review.is_none() {
            *review = ReviewSession::open(self.store.clone(), Box::new(SystemRandom));
        }
        if review.is_none() {
            return Err((StatusCode::NOT_FOUND, NO_CAMPAIGN_MESSAGE.to_string()));
        }
        Ok(review)
    }
}
