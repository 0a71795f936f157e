//! crates/adpatterns_core/src/store.rs
//!
//! The persisted draft store: typed JSON values over a [`KeyValueStore`].
//! Every operation is best-effort. Failures are logged and read as "absent".

use crate::domain::{AdAccount, CampaignDraft, Platform, ProductPayload, Theme};
use crate::ports::{KeyValueStore, PortResult};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

pub const LAST_PAYLOAD_KEY: &str = "adpatterns_last_payload";
pub const SELECTED_PLATFORM_KEY: &str = "adpatterns_selected_platform";
pub const LAST_CAMPAIGN_KEY: &str = "adpatterns_last_campaign";
pub const ACCOUNTS_KEY: &str = "adpatterns_accounts_demo";
pub const AUTH_TOKEN_KEY: &str = "adpatterns_auth_token";
pub const USER_EMAIL_KEY: &str = "adpatterns_user_email";
pub const THEME_KEY: &str = "theme-preference";

#[derive(Clone)]
pub struct DraftStore {
    inner: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Reads and decodes a value. Missing, unreadable and malformed values are all `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.inner.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read '{}' from the store: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed value under '{}': {}", key, e);
                None
            }
        }
    }

    /// Encodes and writes a value. Returns whether the write went through.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode value for '{}': {}", key, e);
                return false;
            }
        };
        match self.inner.set(key, &raw) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write '{}' to the store: {}", key, e);
                false
            }
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.inner.remove(key) {
            warn!("Failed to remove '{}' from the store: {}", key, e);
        }
    }

    // --- Typed accessors for the well-known keys ---

    pub fn last_payload(&self) -> Option<ProductPayload> {
        self.get(LAST_PAYLOAD_KEY)
    }

    pub fn save_payload(&self, payload: &ProductPayload) -> bool {
        self.set(LAST_PAYLOAD_KEY, payload)
    }

    pub fn selected_platform(&self) -> Platform {
        self.get(SELECTED_PLATFORM_KEY).unwrap_or_default()
    }

    pub fn save_platform(&self, platform: Platform) -> bool {
        self.set(SELECTED_PLATFORM_KEY, &platform)
    }

    pub fn last_campaign(&self) -> Option<CampaignDraft> {
        self.get(LAST_CAMPAIGN_KEY)
    }

    pub fn save_campaign(&self, draft: &CampaignDraft) -> bool {
        self.set(LAST_CAMPAIGN_KEY, draft)
    }

    /// The stored access token, if it is non-empty.
    pub fn auth_token(&self) -> Option<String> {
        self.get::<String>(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn user_email(&self) -> Option<String> {
        self.get(USER_EMAIL_KEY)
    }

    pub fn save_session(&self, token: &str, email: &str) -> bool {
        self.set(AUTH_TOKEN_KEY, &token) && self.set(USER_EMAIL_KEY, &email)
    }

    pub fn clear_session(&self) {
        self.remove(AUTH_TOKEN_KEY);
        self.remove(USER_EMAIL_KEY);
    }

    pub fn accounts(&self) -> Option<Vec<AdAccount>> {
        self.get(ACCOUNTS_KEY)
    }

    pub fn save_accounts(&self, accounts: &[AdAccount]) -> bool {
        self.set(ACCOUNTS_KEY, &accounts)
    }

    pub fn theme(&self) -> Theme {
        self.get(THEME_KEY).unwrap_or_default()
    }

    pub fn save_theme(&self, theme: Theme) -> bool {
        self.set(THEME_KEY, &theme)
    }
}

/// An in-process [`KeyValueStore`], used for ephemeral sessions and tests.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| crate::ports::PortError::Unexpected("store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| crate::ports::PortError::Unexpected("store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| crate::ports::PortError::Unexpected("store lock poisoned".to_string()))?;
        values.remove(key);
        Ok(())
    }
}
