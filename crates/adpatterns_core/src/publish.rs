//! crates/adpatterns_core/src/publish.rs
//!
//! Two-phase publishing: create the campaign, then publish it by id.
//!
//! A failed publish after a successful create leaves the campaign as a draft
//! on the backend. The flow remembers the created id, so a retry only
//! re-issues the publish call. Once published, the flow refuses to run again.

use crate::domain::CampaignCreate;
use crate::ports::{CampaignService, PortError};
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PublishState {
    Draft,
    Created { campaign_id: String },
    Published { campaign_id: String },
    Failed { campaign_id: Option<String>, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    #[error("Please login first to publish campaigns")]
    Unauthenticated,
    #[error("This campaign has already been published")]
    AlreadyPublished,
    #[error("{0}")]
    CreateFailed(String),
    #[error("{0}")]
    PublishFailed(String),
}

/// The server's message when it gave one, otherwise a generic fallback.
fn reason(e: PortError, fallback: &str) -> String {
    match e {
        PortError::Rejected(detail) if !detail.trim().is_empty() => detail,
        PortError::Unauthorized => "Unauthorized".to_string(),
        _ => fallback.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct PublishFlow {
    state: PublishState,
}

impl Default for PublishFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishFlow {
    pub fn new() -> Self {
        Self { state: PublishState::Draft }
    }

    pub fn state(&self) -> &PublishState {
        &self.state
    }

    pub fn is_published(&self) -> bool {
        matches!(self.state, PublishState::Published { .. })
    }

    /// The id of the campaign created on the backend, if any.
    fn created_id(&self) -> Option<&str> {
        match &self.state {
            PublishState::Created { campaign_id }
            | PublishState::Failed { campaign_id: Some(campaign_id), .. } => Some(campaign_id),
            _ => None,
        }
    }

    /// Runs (or resumes) the create-then-publish sequence and returns the campaign id.
    pub async fn publish(
        &mut self,
        service: &dyn CampaignService,
        token: Option<&str>,
        campaign: &CampaignCreate,
    ) -> Result<String, PublishError> {
        if self.is_published() {
            return Err(PublishError::AlreadyPublished);
        }
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(PublishError::Unauthenticated),
        };

        let campaign_id = match self.created_id() {
            Some(id) => {
                info!("Retrying publish for already created campaign {}", id);
                id.to_string()
            }
            None => match service.create_campaign(token, campaign).await {
                Ok(id) => {
                    info!("Created campaign {} ('{}')", id, campaign.name);
                    self.state = PublishState::Created { campaign_id: id.clone() };
                    id
                }
                Err(e) => {
                    let reason = reason(e, "Failed to create campaign");
                    error!("Error creating campaign: {}", reason);
                    self.state = PublishState::Failed { campaign_id: None, reason: reason.clone() };
                    return Err(PublishError::CreateFailed(reason));
                }
            },
        };

        match service.publish_campaign(token, &campaign_id).await {
            Ok(()) => {
                info!("Published campaign {}", campaign_id);
                self.state = PublishState::Published { campaign_id: campaign_id.clone() };
                Ok(campaign_id)
            }
            Err(e) => {
                let reason = reason(e, "Failed to publish campaign");
                error!("Error publishing campaign {}: {}", campaign_id, reason);
                self.state = PublishState::Failed {
                    campaign_id: Some(campaign_id),
                    reason: reason.clone(),
                };
                Err(PublishError::PublishFailed(reason))
            }
        }
    }
}
