//! Block Explorer Client - Etherscan V2 compatible
//!
//! Two account lookups, both keyed by `(address, chain_id)`:
//! - `module=account&action=balance` → native balance in wei (decimal string)
//! - `module=account&action=txlist`  → recent transactions, newest first
//!
//! Every failure is returned as a `LookupFailure` so callers can tell a dead
//! network apart from a non-2xx answer, a garbled body, or a provider error.
//! Network failures, HTTP 429 and 5xx are retried with exponential backoff
//! and jitter. The API key is never logged.

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::models::config::ExplorerConfig;
use crate::models::errors::{AppError, AppResult, ErrorCode, LookupFailure};
use crate::models::types::{ExplorerEnvelope, TransactionRecord};
use crate::utils::constants::{
    get_chain_name, parse_wei, EXPLORER_BASE_RETRY_MS, EXPLORER_MAX_RETRY_MS,
    RETRY_JITTER_PERCENT, USER_AGENT as USER_AGENT_CONST,
};

/// Explorer HTTP client; cheap to clone
#[derive(Clone)]
pub struct ExplorerClient {
    client: reqwest::Client,
    config: ExplorerConfig,
}

impl ExplorerClient {
    pub fn new(config: ExplorerConfig) -> AppResult<Self> {
        let client = Self::build_client(config.timeout)?;
        Ok(Self { client, config })
    }

    /// Client configured from environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::new(ExplorerConfig::from_env()?)
    }

    /// Build HTTP client with custom headers and gzip
    fn build_client(timeout: Duration) -> AppResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorCode::ConfigInvalidValue, "Failed to build HTTP client", e)
            })
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Native balance of `address` in wei, as the decimal string the explorer returns
    pub async fn fetch_balance(&self, address: &str, chain_id: u64) -> Result<String, LookupFailure> {
        let params = [
            ("module", "account"),
            ("action", "balance"),
            ("address", address),
            ("tag", "latest"),
        ];
        let envelope = self.query(chain_id, &params).await?;

        if envelope.is_error() {
            return Err(LookupFailure::Provider {
                message: envelope.error_text(),
            });
        }

        let balance = envelope
            .result
            .as_str()
            .ok_or_else(|| LookupFailure::invalid_payload("balance result is not a string"))?;

        if parse_wei(balance).is_none() {
            return Err(LookupFailure::invalid_payload(format!(
                "balance is not an unsigned integer: {:?}",
                balance
            )));
        }

        debug!(chain_id, address, balance, "Balance fetched");
        Ok(balance.to_string())
    }

    /// Recent transactions of `address`, newest first
    pub async fn fetch_transactions(
        &self,
        address: &str,
        chain_id: u64,
    ) -> Result<Vec<TransactionRecord>, LookupFailure> {
        let params = [
            ("module", "account"),
            ("action", "txlist"),
            ("address", address),
            ("sort", "desc"),
        ];
        let envelope = self.query(chain_id, &params).await?;

        if envelope.is_empty_history() {
            info!("📭 No transactions for {} on {}", address, get_chain_name(chain_id));
            return Ok(Vec::new());
        }
        if envelope.is_error() {
            return Err(LookupFailure::Provider {
                message: envelope.error_text(),
            });
        }
        if !envelope.result.is_array() {
            return Err(LookupFailure::invalid_payload("txlist result is not an array"));
        }

        let records: Vec<TransactionRecord> = serde_json::from_value(envelope.result)?;
        info!(
            "📊 Explorer: {} transactions for {} on {}",
            records.len(),
            address,
            get_chain_name(chain_id)
        );
        Ok(records)
    }

    /// GET with retry; returns the parsed envelope
    async fn query(
        &self,
        chain_id: u64,
        params: &[(&str, &str)],
    ) -> Result<ExplorerEnvelope, LookupFailure> {
        let max_attempts = self.config.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let delay = retry_delay(attempt);
                debug!("⏳ Retry {}/{} after {}ms", attempt, self.config.max_retries, delay.as_millis());
                tokio::time::sleep(delay).await;
            }
            attempt += 1;

            match self.execute(chain_id, params).await {
                Ok(envelope) => return Ok(envelope),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(
                        code = e.code().as_str(),
                        attempt,
                        max_attempts,
                        "⚠️ Explorer request failed: {}",
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Single request, no retry
    async fn execute(
        &self,
        chain_id: u64,
        params: &[(&str, &str)],
    ) -> Result<ExplorerEnvelope, LookupFailure> {
        let chain = chain_id.to_string();
        let mut request = self
            .client
            .get(&self.config.api_url)
            .query(&[("chainid", chain.as_str())])
            .query(params);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("apikey", key.as_str())]);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupFailure::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let envelope: ExplorerEnvelope = serde_json::from_str(&body)?;
        Ok(envelope)
    }
}

/// Exponential backoff with ±jitter, capped
fn retry_delay(attempt: u32) -> Duration {
    let base_delay = EXPLORER_BASE_RETRY_MS.saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1)));
    let capped_delay = base_delay.min(EXPLORER_MAX_RETRY_MS);

    let jitter_range = (capped_delay * RETRY_JITTER_PERCENT) / 100;
    let jitter: i64 = rand::thread_rng().gen_range(-(jitter_range as i64)..=(jitter_range as i64));
    Duration::from_millis((capped_delay as i64 + jitter).max(100) as u64)
}
