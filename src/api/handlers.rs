//! API Request Handlers

use alloy_primitives::Address;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Json, OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::types::*;
use crate::core::classifier::{classify_entity, EntityType};
use crate::core::signals::TransactionSignals;
use crate::core::vault_score::{compute_vault_score, ScanInput};
use crate::models::errors::{AppError, AppResult};
use crate::models::types::TransactionRecord;
use crate::providers::explorer::ExplorerClient;
use crate::utils::constants::{
    get_chain_name, get_explorer_url, get_native_symbol, is_chain_supported, parse_wei,
    wei_to_native,
};
use crate::utils::format::format_address;
use crate::utils::telemetry::TelemetryCollector;

/// Maximum items per batch request
pub const MAX_BATCH_SIZE: usize = 100;

/// Concurrent batch items (each may hit the explorer)
pub const MAX_CONCURRENT_BATCH_ITEMS: usize = 10;

/// Plain-text body of the scan echo endpoint on missing fields
pub const SCAN_REQUIRED_MESSAGE: &str = "Address and results are required";

type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

/// Shared application state
pub struct AppState {
    pub explorer: ExplorerClient,
    pub telemetry: Arc<TelemetryCollector>,
    pub start_time: Instant,
    pub batch_semaphore: Arc<Semaphore>,
}

impl AppState {
    pub fn new(explorer: ExplorerClient, telemetry: Arc<TelemetryCollector>) -> Self {
        Self {
            explorer,
            telemetry,
            start_time: Instant::now(),
            batch_semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_BATCH_ITEMS)),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Standard error envelope with the status mapped from the error code
fn error_response(err: &AppError, start: Instant) -> (StatusCode, Json<ApiResponse<()>>) {
    ApiResponse::failure(err, elapsed_ms(start))
}

/// Unwrap a JSON body, answering malformed ones with the error envelope
fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    start: Instant,
) -> Result<T, (StatusCode, Json<ApiResponse<()>>)> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        let err = AppError::bad_request(rejection.body_text());
        warn!(code = err.code_str(), "Malformed request body: {}", err.message);
        error_response(&err, start)
    })
}

/// Fallback for unknown routes
pub async fn not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<ApiResponse<()>>) {
    ApiResponse::failure(&AppError::not_found(uri.path()), 0.0)
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let stats = state.telemetry.get_stats();

    let data = StatsData {
        total_scans: stats.total_scans,
        scans_by_label: stats.scans_by_label,
        avg_latency_ms: stats.avg_latency_ms,
        total_lookups: stats.total_lookups,
        lookup_failures: stats.lookup_failures,
        uptime_seconds: state.uptime_seconds(),
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Classification
// ============================================

pub async fn classify(payload: Result<Json<ClassifyRequest>, JsonRejection>) -> ApiResult<ClassifyData> {
    let start = Instant::now();
    let req = json_body(payload, start)?;
    let entity_type = classify_entity(&req.query);

    Ok(Json(ApiResponse::success(
        ClassifyData {
            query: req.query,
            entity_type,
        },
        elapsed_ms(start),
    )))
}

// ============================================
// VaultScore
// ============================================

pub async fn vault_score(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VaultScoreRequest>, JsonRejection>,
) -> ApiResult<VaultScoreData> {
    let start = Instant::now();
    let req = json_body(payload, start)?;

    match score_request(&state, req).await {
        Ok(data) => {
            state
                .telemetry
                .record_scan(data.label, start.elapsed().as_millis() as u64);
            info!(
                "🛡️ VaultScore {} ({}) for {} entity",
                data.score, data.label_name, data.entity_type
            );
            Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
        }
        Err(e) => {
            warn!(code = e.code_str(), "VaultScore request rejected: {}", e.message);
            Err(error_response(&e, start))
        }
    }
}

pub async fn batch_vault_score(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchVaultScoreRequest>, JsonRejection>,
) -> ApiResult<BatchVaultScoreData> {
    let start = Instant::now();
    let req = json_body(payload, start)?;

    // Validate request
    if req.items.is_empty() {
        return Err(error_response(
            &AppError::bad_request("items array cannot be empty"),
            start,
        ));
    }

    if req.items.len() > MAX_BATCH_SIZE {
        return Err(error_response(
            &AppError::bad_request(format!("Maximum {} items per batch request", MAX_BATCH_SIZE)),
            start,
        ));
    }

    let total_requested = req.items.len();
    let mut handles = Vec::with_capacity(total_requested);

    for (index, item) in req.items.into_iter().enumerate() {
        let state = state.clone();

        let handle = tokio::spawn(async move {
            let item_start = Instant::now();
            let outcome = match state.batch_semaphore.clone().acquire_owned().await {
                Ok(_permit) => score_request(&state, item).await,
                Err(_) => Err(AppError::internal("batch worker pool closed")),
            };

            match outcome {
                Ok(data) => {
                    state
                        .telemetry
                        .record_scan(data.label, item_start.elapsed().as_millis() as u64);
                    BatchItemResult {
                        index,
                        status: "success".to_string(),
                        result: Some(data),
                        error: None,
                        latency_ms: elapsed_ms(item_start),
                    }
                }
                Err(e) => BatchItemResult {
                    index,
                    status: "error".to_string(),
                    result: None,
                    error: Some(ApiError::from(&e)),
                    latency_ms: elapsed_ms(item_start),
                },
            }
        });

        handles.push((index, handle));
    }

    // Collect results in request order
    let mut results = Vec::with_capacity(total_requested);
    for (index, handle) in handles {
        match handle.await {
            Ok(result) => results.push(result),
            Err(e) => results.push(BatchItemResult {
                index,
                status: "error".to_string(),
                result: None,
                error: Some(ApiError::from(&AppError::internal(format!(
                    "batch item task failed: {}",
                    e
                )))),
                latency_ms: 0.0,
            }),
        }
    }

    let total_failed = results.iter().filter(|r| r.result.is_none()).count();
    info!(
        "📦 Batch: {} items, {} failed in {:.1}ms",
        total_requested,
        total_failed,
        elapsed_ms(start)
    );

    let data = BatchVaultScoreData {
        total_requested,
        total_processed: results.len() - total_failed,
        total_failed,
        results,
        processing_time_ms: elapsed_ms(start),
    };

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

/// Validate one request, optionally fetch on-chain signals, and score it
pub async fn score_request(state: &AppState, req: VaultScoreRequest) -> AppResult<VaultScoreData> {
    let entity_type = resolve_entity_type(&req)?;

    if !req.rug_pull_risk.is_finite() || !(0.0..=1.0).contains(&req.rug_pull_risk) {
        return Err(AppError::invalid_scan_input(format!(
            "rug_pull_risk must be between 0 and 1, got {}",
            req.rug_pull_risk
        )));
    }

    let mut signals: Option<TransactionSignals> = None;
    let deep_scan = match req.deep_scan {
        Some(DeepScanRequest::Signals(deep)) => Some(deep),
        Some(DeepScanRequest::Fetch(true)) => {
            if entity_type != EntityType::Address {
                return Err(AppError::invalid_scan_input(format!(
                    "deep_scan lookups need an address entity, got {}",
                    entity_type
                )));
            }
            let address = req
                .address
                .as_deref()
                .or(req.query.as_deref())
                .ok_or_else(|| AppError::bad_request("address is required for deep_scan"))?;

            let transactions = lookup_transactions(state, address, req.chain_id).await?;
            let derived = TransactionSignals::from_transactions(address, &transactions);
            let deep = derived.deep_scan.clone();
            signals = Some(derived);
            Some(deep)
        }
        Some(DeepScanRequest::Fetch(false)) | None => None,
    };

    let suspicious_transaction_count = req
        .suspicious_transaction_count
        .or_else(|| signals.as_ref().map(|s| s.suspicious_transaction_count))
        .unwrap_or(0);

    let input = ScanInput {
        entity_type,
        suspicious_transaction_count,
        contract_verified: req.contract_verified,
        liquidity_locked: req.liquidity_locked,
        holder_count: req.holder_count,
        rug_pull_risk: req.rug_pull_risk,
        token: req.token,
        company: req.company,
        deep_scan,
    };

    let result = compute_vault_score(&input);
    Ok(VaultScoreData::new(req.query, entity_type, result, signals))
}

/// Explicit type wins; otherwise classify the query
fn resolve_entity_type(req: &VaultScoreRequest) -> AppResult<EntityType> {
    match (&req.entity_type, &req.query) {
        (Some(raw), _) => raw.parse().map_err(AppError::invalid_scan_input),
        (None, Some(query)) => Ok(classify_entity(query)),
        (None, None) => Err(AppError::bad_request("query or entity_type is required")),
    }
}

// ============================================
// Address Lookups
// ============================================

pub async fn address_balance(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Query(query): Query<ChainQuery>,
) -> ApiResult<BalanceData> {
    let start = Instant::now();
    let chain_id = query.chain_id;

    match lookup_balance(&state, &address, chain_id).await {
        Ok(balance_wei) => {
            let balance = parse_wei(&balance_wei).map(wei_to_native).unwrap_or(0.0);
            info!(
                "💰 {} holds {:.6} {} on {}",
                format_address(&address),
                balance,
                get_native_symbol(chain_id),
                get_chain_name(chain_id)
            );

            let data = BalanceData {
                explorer_url: format!("{}/address/{}", get_explorer_url(chain_id), address),
                address,
                chain_id,
                chain_name: get_chain_name(chain_id).to_string(),
                native_symbol: get_native_symbol(chain_id).to_string(),
                balance_wei,
                balance,
            };
            Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
        }
        Err(e) => {
            warn!(code = e.code_str(), "Balance lookup failed: {}", e.message);
            Err(error_response(&e, start))
        }
    }
}

pub async fn address_transactions(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Query(query): Query<ChainQuery>,
) -> ApiResult<TransactionsData> {
    let start = Instant::now();
    let chain_id = query.chain_id;

    match lookup_transactions(&state, &address, chain_id).await {
        Ok(transactions) => {
            let signals = TransactionSignals::from_transactions(&address, &transactions);
            let data = TransactionsData {
                chain_name: get_chain_name(chain_id).to_string(),
                count: transactions.len(),
                address,
                chain_id,
                signals,
                transactions,
            };
            Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
        }
        Err(e) => {
            warn!(code = e.code_str(), "Transaction lookup failed: {}", e.message);
            Err(error_response(&e, start))
        }
    }
}

async fn lookup_balance(state: &AppState, address: &str, chain_id: u64) -> AppResult<String> {
    validate_lookup(address, chain_id)?;
    let result = state.explorer.fetch_balance(address, chain_id).await;
    state.telemetry.record_lookup(result.is_ok());
    result.map_err(AppError::from)
}

/// Validated transaction lookup that feeds the lookup counters
async fn lookup_transactions(
    state: &AppState,
    address: &str,
    chain_id: u64,
) -> AppResult<Vec<TransactionRecord>> {
    validate_lookup(address, chain_id)?;
    let result = state.explorer.fetch_transactions(address, chain_id).await;
    state.telemetry.record_lookup(result.is_ok());
    result.map_err(AppError::from)
}

fn validate_lookup(address: &str, chain_id: u64) -> AppResult<()> {
    if !address.starts_with("0x") || address.parse::<Address>().is_err() {
        return Err(AppError::invalid_address(address));
    }
    if !is_chain_supported(chain_id) {
        return Err(AppError::unsupported_chain(chain_id));
    }
    Ok(())
}

// ============================================
// Scan echo / save
// ============================================

/// Echo `{address, results}` back; both must be present and truthy
pub async fn scan_echo(body: Bytes) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let address = body.get("address").cloned().unwrap_or(Value::Null);
    let results = body.get("results").cloned().unwrap_or(Value::Null);

    if !is_truthy(&address) || !is_truthy(&results) {
        return (StatusCode::BAD_REQUEST, SCAN_REQUIRED_MESSAGE).into_response();
    }

    Json(json!({ "address": address, "results": results })).into_response()
}

/// Nothing is stored
pub async fn scan_save() -> Json<Value> {
    Json(json!({ "success": true }))
}

/// JavaScript truthiness of a JSON value
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
