//! Configuration module for VaultCore
//!
//! Everything is read from environment variables (optionally seeded from a
//! `.env` file by the binaries). Defaults live in utils/constants.rs.

use std::time::Duration;
use tracing::{info, warn};

use super::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_EXPLORER_API_URL, DEFAULT_EXPLORER_MAX_RETRIES, DEFAULT_EXPLORER_TIMEOUT_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, MAX_EXPLORER_RETRIES,
};

/// Settings for the Etherscan-compatible explorer client
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Base endpoint, e.g. https://api.etherscan.io/v2/api
    pub api_url: String,
    /// API key; never logged
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first failed attempt
    pub max_retries: u32,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_EXPLORER_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_EXPLORER_TIMEOUT_SECS),
            max_retries: DEFAULT_EXPLORER_MAX_RETRIES,
        }
    }
}

impl ExplorerConfig {
    /// Load from process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let defaults = Self::default();

        let api_url = var("ETHERSCAN_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.api_url);

        let api_key = var("ETHERSCAN_API_KEY").filter(|k| !k.is_empty() && k != "YOUR_API_KEY");
        if api_key.is_some() {
            info!("🔑 ETHERSCAN_API_KEY configured (key hidden)");
        }

        let timeout = match var("EXPLORER_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("EXPLORER_TIMEOUT_SECS", &raw)?),
            None => defaults.timeout,
        };

        let max_retries = match var("EXPLORER_MAX_RETRIES") {
            Some(raw) => parse_number("EXPLORER_MAX_RETRIES", &raw)?,
            None => defaults.max_retries,
        };
        if max_retries > MAX_EXPLORER_RETRIES {
            warn!(
                "⚠️ EXPLORER_MAX_RETRIES={} capped to {}",
                max_retries, MAX_EXPLORER_RETRIES
            );
        }
        let max_retries = max_retries.min(MAX_EXPLORER_RETRIES);

        Ok(Self {
            api_url,
            api_key,
            timeout,
            max_retries,
        })
    }

    /// Point the client at a different endpoint (tests, self-hosted explorers)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Settings for the HTTP API server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per client per minute
    pub rate_limit_per_minute: u32,
    /// Upper bound for one request; slower requests get a 504
    pub request_timeout: Duration,
    pub explorer: ExplorerConfig,
}

impl ServerConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let host = var("VAULTCORE_HOST")
            .or_else(|| var("HOST"))
            .unwrap_or_else(|| "0.0.0.0".to_string());

        // PORT wins so PaaS platforms can inject it
        let port = match var("PORT").or_else(|| var("VAULTCORE_PORT")) {
            Some(raw) => parse_number("PORT", &raw)?,
            None => 8080,
        };

        let rate_limit_per_minute = match var("RATE_LIMIT_PER_MINUTE") {
            Some(raw) => parse_number("RATE_LIMIT_PER_MINUTE", &raw)?,
            None => 100,
        };

        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => match parse_number("REQUEST_TIMEOUT_SECS", &raw)? {
                0 => return Err(AppError::invalid_config("REQUEST_TIMEOUT_SECS", &raw)),
                secs => Duration::from_secs(secs),
            },
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Self {
            host,
            port,
            rate_limit_per_minute,
            request_timeout,
            explorer: ExplorerConfig::from_vars(&var)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::invalid_config(key, raw))
}
