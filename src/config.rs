// SPDX-License-Identifier: MIT

//! Client runtime configuration loaded from environment variables.
//!
//! Everything has a sensible local default except the backend API base URL,
//! which the client cannot guess.

use std::env;
use std::path::PathBuf;

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend REST API (e.g. `https://api.chime.app`).
    pub api_base_url: String,
    /// Port the boundary routes listen on.
    pub port: u16,
    /// Path of the JSON file backing the session store.
    pub storage_path: PathBuf,
    /// Where a forced logout navigates to.
    pub login_path: String,
    /// Backend push registration endpoint (relative to `api_base_url`).
    pub push_endpoint: String,
    /// Cache generation; bumped on deploy to invalidate static buckets.
    pub cache_generation: u32,
    /// Outbound request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            port: 8787,
            storage_path: PathBuf::from("data/session.json"),
            login_path: "/login".to_string(),
            push_endpoint: "/api/push".to_string(),
            cache_generation: 1,
            request_timeout_secs: 15,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map_err(|_| ConfigError::Missing("API_BASE_URL"))?
                .trim_end_matches('/')
                .to_string(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse()
                .unwrap_or(8787),
            storage_path: env::var("SESSION_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/session.json")),
            login_path: env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string()),
            push_endpoint: env::var("PUSH_ENDPOINT").unwrap_or_else(|_| "/api/push".to_string()),
            cache_generation: env::var("CACHE_GENERATION")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("CACHE_GENERATION"))?,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
