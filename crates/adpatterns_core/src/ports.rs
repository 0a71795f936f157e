//! crates/adpatterns_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the remote backend and of where drafts are persisted.

use crate::domain::{CampaignCreate, SuggestionCriteria, SuggestionResult};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., HTTP, file system).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The backend answered with a non-success status and, usually, a `detail` message.
    #[error("{0}")]
    Rejected(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait SuggestionService: Send + Sync {
    /// Requests generated headlines, descriptions, keywords and a CTA.
    async fn generate_suggestions(&self, criteria: &SuggestionCriteria)
        -> PortResult<SuggestionResult>;
}

#[async_trait]
pub trait CampaignService: Send + Sync {
    /// Creates a campaign and returns its backend id.
    async fn create_campaign(&self, token: &str, campaign: &CampaignCreate) -> PortResult<String>;

    async fn publish_campaign(&self, token: &str, campaign_id: &str) -> PortResult<()>;
}

/// The fields of an account registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for an access token.
    async fn login(&self, email: &str, password: &str) -> PortResult<String>;

    /// Creates an account and returns its access token.
    async fn register(&self, registration: &Registration) -> PortResult<String>;
}

/// A string-keyed store of string values, in the manner of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> PortResult<()>;

    fn remove(&self, key: &str) -> PortResult<()>;
}

/// A source of uniformly distributed indices.
pub trait RandomSource: Send {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}
