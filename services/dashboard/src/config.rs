//! services/dashboard/src/config.rs
//!
//! Defines the dashboard's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Base URL of the remote ad-generation and campaign backend.
    pub api_url: String,
    pub log_level: Level,
    pub store_path: PathBuf,
    pub request_timeout: Duration,
    /// The pause between accepting a wizard submission and showing the confirmation step.
    pub submit_delay: Duration,
    pub cors_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3001)),
            api_url: "http://localhost:8000".to_string(),
            log_level: Level::INFO,
            store_path: PathBuf::from("./adpatterns_store.json"),
            request_timeout: Duration::from_secs(30),
            submit_delay: Duration::from_millis(1500),
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let defaults = Self::default();

        // --- Server Settings ---
        let bind_address = parse_var("BIND_ADDRESS", defaults.bind_address)?;
        let cors_origin = std::env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Backend Settings ---
        let api_url = std::env::var("API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);
        if api_url.is_empty() {
            return Err(ConfigError::InvalidValue(
                "API_URL".to_string(),
                "the backend URL cannot be empty".to_string(),
            ));
        }
        let request_timeout =
            Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout.as_secs())?);

        // --- Local Storage and Wizard Settings ---
        let store_path = std::env::var("STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);
        let submit_delay = Duration::from_millis(parse_var(
            "SUBMIT_DELAY_MS",
            defaults.submit_delay.as_millis() as u64,
        )?);

        Ok(Self {
            bind_address,
            api_url,
            log_level,
            store_path,
            request_timeout,
            submit_delay,
            cors_origin,
        })
    }
}
