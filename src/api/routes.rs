//! API Route Configuration

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware,
    routing::{get, post},
    BoxError, Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers::{self, AppState};
use super::middleware::{logging_middleware, rate_limit_middleware};
use super::types::ApiResponse;
use crate::models::errors::AppError;

/// Create the API router with all routes and middleware
///
/// `request_timeout` bounds one request, explorer retries included.
pub fn create_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health & Status
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        // Scoring
        .route("/classify", post(handlers::classify))
        .route("/vaultscore", post(handlers::vault_score))
        .route("/vaultscore/batch", post(handlers::batch_vault_score))
        // Explorer lookups
        .route("/address/:address/balance", get(handlers::address_balance))
        .route(
            "/address/:address/transactions",
            get(handlers::address_transactions),
        );

    // Web scanner endpoints, bodies kept as the scanner expects them
    let scanner = Router::new()
        .route("/scan", post(handlers::scan_echo))
        .route("/scan/save", post(handlers::scan_save));

    // Build full router
    Router::new()
        .nest("/v1", api_v1)
        .nest("/api", scanner)
        // Also expose at root for convenience
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err| {
                    handle_timeout_error(err, request_timeout)
                }))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        // Middleware (order matters - bottom runs first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(rate_limit_middleware))
}

async fn handle_timeout_error(
    err: BoxError,
    request_timeout: Duration,
) -> (StatusCode, Json<ApiResponse<()>>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("⏱️ Request exceeded {}ms", request_timeout.as_millis());
        ApiResponse::failure(
            &AppError::request_timeout(request_timeout),
            request_timeout.as_millis() as f64,
        )
    } else {
        ApiResponse::failure(&AppError::internal(err.to_string()), 0.0)
    }
}
