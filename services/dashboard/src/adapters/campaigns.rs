//! services/dashboard/src/adapters/campaigns.rs
//!
//! This module contains the adapter for the campaign management endpoints.
//! It implements the `CampaignService` port from the `core` crate.

use crate::adapters::backend::{decode, rejection, transport, BackendClient};
use adpatterns_core::{
    domain::CampaignCreate,
    ports::{CampaignService, PortError, PortResult},
};
use async_trait::async_trait;
use serde::Deserialize;

/// The part of a created campaign we care about. Some backends answer with `_id`.
#[derive(Deserialize)]
struct CreatedCampaign {
    id: Option<String>,
    #[serde(rename = "_id")]
    mongo_id: Option<String>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CampaignService` with bearer-authenticated requests.
#[derive(Clone)]
pub struct HttpCampaignAdapter {
    backend: BackendClient,
}

impl HttpCampaignAdapter {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

//=========================================================================================
// `CampaignService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CampaignService for HttpCampaignAdapter {
    async fn create_campaign(&self, token: &str, campaign: &CampaignCreate) -> PortResult<String> {
        let response = self
            .backend
            .client()
            .post(self.backend.url("/api/campaigns"))
            .bearer_auth(token)
            .json(campaign)
            .send()
            .await
            .map_err(transport)?;

        let created: CreatedCampaign = decode(response).await?;
        created
            .id
            .or(created.mongo_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PortError::Unexpected("created campaign has no id".to_string()))
    }

    async fn publish_campaign(&self, token: &str, campaign_id: &str) -> PortResult<()> {
        let response = self
            .backend
            .client()
            .post(self.backend.url(&format!("/api/campaigns/{}/publish", campaign_id)))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(rejection(response).await)
        }
    }
}
