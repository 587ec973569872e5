//! Runtime configuration read from the environment.

use axum::http::HeaderValue;
use std::net::SocketAddr;

use crate::storage::connection::DEFAULT_DATABASE_URL;

pub const DATABASE_URL_VAR: &str = "GRADEBOOK_DATABASE_URL";
pub const BIND_ADDR_VAR: &str = "GRADEBOOK_BIND_ADDR";
pub const CORS_ORIGIN_VAR: &str = "GRADEBOOK_CORS_ORIGIN";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Origin allowed to call the API from a browser
    pub cors_origin: HeaderValue,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup; unset keys fall back to
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: BIND_ADDR_VAR,
                reason: e.to_string(),
            })?;

        let cors_origin = lookup(CORS_ORIGIN_VAR)
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .parse::<HeaderValue>()
            .map_err(|e| ConfigError::Invalid {
                key: CORS_ORIGIN_VAR,
                reason: e.to_string(),
            })?;

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin,
        })
    }
}
