//! API Request/Response Types

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::classifier::EntityType;
use crate::core::signals::TransactionSignals;
use crate::core::vault_score::{
    CompanyProfile, DeepScanSignals, ScoreAdjustment, ScoreLabel, ScoreResult, TokenMetrics,
};
use crate::models::errors::AppError;
use crate::models::types::TransactionRecord;
use crate::utils::constants::CHAIN_ID_ETHEREUM;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Error envelope paired with the HTTP status of its code
    pub fn failure(err: &AppError, latency_ms: f64) -> (StatusCode, Json<Self>) {
        let status = StatusCode::from_u16(err.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(Self::error(ApiError::from(err), latency_ms)))
    }
}

/// API Error
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: None,
        }
    }
}

fn default_chain_id() -> u64 {
    CHAIN_ID_ETHEREUM
}

// ============================================
// Classification
// ============================================

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyData {
    pub query: String,
    pub entity_type: EntityType,
}

// ============================================
// VaultScore
// ============================================

/// `deep_scan` is either a flag asking the server to fetch and derive the
/// signals, or the signals themselves
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeepScanRequest {
    Fetch(bool),
    Signals(DeepScanSignals),
}

#[derive(Debug, Clone, Deserialize)]
pub struct VaultScoreRequest {
    /// Raw scanner query; classified when `entity_type` is absent
    #[serde(default)]
    pub query: Option<String>,
    /// Explicit entity type, overrides classification
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Address to look up when `deep_scan` is `true`; defaults to `query`
    #[serde(default)]
    pub address: Option<String>,
    /// When absent and transactions were fetched, the derived count is used
    #[serde(default)]
    pub suspicious_transaction_count: Option<u32>,
    #[serde(default)]
    pub contract_verified: bool,
    #[serde(default)]
    pub liquidity_locked: bool,
    #[serde(default)]
    pub holder_count: u64,
    #[serde(default)]
    pub rug_pull_risk: f64,
    #[serde(default)]
    pub token: Option<TokenMetrics>,
    #[serde(default)]
    pub company: Option<CompanyProfile>,
    #[serde(default)]
    pub deep_scan: Option<DeepScanRequest>,
    /// Chain ID (1 = Ethereum, 56 = BSC, 137 = Polygon, etc.)
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

#[derive(Debug, Serialize)]
pub struct VaultScoreData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub entity_type: EntityType,
    pub score: u8,
    pub label: ScoreLabel,
    /// Display name, e.g. "Very Poor"
    pub label_name: String,
    pub description: String,
    pub color: String,
    pub breakdown: Vec<ScoreAdjustment>,
    /// Present when the server fetched transactions for the address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signals: Option<TransactionSignals>,
}

impl VaultScoreData {
    pub fn new(
        query: Option<String>,
        entity_type: EntityType,
        result: ScoreResult,
        signals: Option<TransactionSignals>,
    ) -> Self {
        Self {
            query,
            entity_type,
            score: result.score,
            label: result.label,
            label_name: result.label.as_str().to_string(),
            description: result.label.description().to_string(),
            color: result.label.color_code().to_string(),
            breakdown: result.breakdown,
            signals,
        }
    }
}

// ============================================
// Batch VaultScore
// ============================================

#[derive(Debug, Deserialize)]
pub struct BatchVaultScoreRequest {
    pub items: Vec<VaultScoreRequest>,
}

#[derive(Debug, Serialize)]
pub struct BatchVaultScoreData {
    pub total_requested: usize,
    pub total_processed: usize,
    pub total_failed: usize,
    pub results: Vec<BatchItemResult>,
    pub processing_time_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct BatchItemResult {
    pub index: usize,
    pub status: String, // "success" | "error"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<VaultScoreData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
}

// ============================================
// Address Lookups
// ============================================

#[derive(Debug, Deserialize)]
pub struct ChainQuery {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

#[derive(Debug, Serialize)]
pub struct BalanceData {
    pub address: String,
    pub chain_id: u64,
    pub chain_name: String,
    pub native_symbol: String,
    /// Raw balance as returned by the explorer
    pub balance_wei: String,
    /// Balance in native units (lossy)
    pub balance: f64,
    pub explorer_url: String,
}

#[derive(Debug, Serialize)]
pub struct TransactionsData {
    pub address: String,
    pub chain_id: u64,
    pub chain_name: String,
    pub count: usize,
    pub signals: TransactionSignals,
    pub transactions: Vec<TransactionRecord>,
}

// ============================================
// Stats / Telemetry
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub total_scans: u64,
    pub scans_by_label: BTreeMap<String, u64>,
    pub avg_latency_ms: f64,
    pub total_lookups: u64,
    pub lookup_failures: u64,
    pub uptime_seconds: u64,
    pub api_version: String,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
