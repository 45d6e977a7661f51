//! VaultCore API Server
//!
//! REST API for entity classification, VaultScore and explorer lookups
//!
//! Usage:
//!   cargo run --bin vaultcore_api
//!
//! Environment (a `.env` file is read when present):
//!   PORT / VAULTCORE_PORT    - Server port (default: 8080)
//!   VAULTCORE_HOST / HOST    - Server host (default: 0.0.0.0)
//!   ETHERSCAN_API_URL        - Explorer endpoint (default: Etherscan V2)
//!   ETHERSCAN_API_KEY        - Explorer API key
//!   EXPLORER_TIMEOUT_SECS    - Per-request explorer timeout (default: 10)
//!   EXPLORER_MAX_RETRIES     - Explorer retries (default: 3)
//!   RATE_LIMIT_PER_MINUTE    - Requests per client per minute (default: 100)
//!   RUST_LOG                 - Log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vaultcore::api::middleware::RATE_LIMITER;
use vaultcore::api::{create_router, handlers::AppState, start_cleanup_task};
use vaultcore::utils::constants::{APP_NAME, APP_VERSION};
use vaultcore::{ExplorerClient, ServerConfig, TelemetryCollector};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to read .env: {}", e);
        }
    }

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = ServerConfig::from_env()?;

    // Initialize telemetry
    let telemetry = Arc::new(TelemetryCollector::new());
    let telemetry_for_shutdown = telemetry.clone();

    // Create app state
    let explorer = ExplorerClient::new(config.explorer.clone())?;
    if explorer.config().api_key.is_none() {
        warn!("⚠️ ETHERSCAN_API_KEY not set, explorer lookups will be heavily rate limited");
    }
    let state = Arc::new(AppState::new(explorer, telemetry));

    // Rate limiter budget and background cleanup
    RATE_LIMITER.set_limit(config.rate_limit_per_minute);
    start_cleanup_task();
    info!(
        "🧹 Rate limiter: {} requests/minute per client, cleanup task started",
        config.rate_limit_per_minute
    );

    // Create router
    let app = create_router(state, config.request_timeout);

    let addr: SocketAddr = config.bind_addr().parse()?;

    info!("🚀 {} API v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /v1/classify                       - Entity type of a query");
    info!("  POST /v1/vaultscore                     - VaultScore for one entity");
    info!("  POST /v1/vaultscore/batch               - Batch scoring (up to 100 items)");
    info!("  GET  /v1/address/:address/balance       - Native balance");
    info!("  GET  /v1/address/:address/transactions  - Transactions and derived signals");
    info!("  POST /api/scan, /api/scan/save          - Web scanner endpoints");
    info!("  GET  /v1/stats                          - Scan statistics");
    info!("  GET  /v1/health                         - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    // Start server with graceful shutdown
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Graceful shutdown sequence
    info!("🛑 Shutdown signal received, cleaning up...");
    let stats = telemetry_for_shutdown.get_stats();
    info!("   Total scans: {}", stats.total_scans);
    info!("   Avg latency: {:.1}ms", stats.avg_latency_ms);
    info!(
        "   Explorer lookups: {} ({} failed)",
        stats.total_lookups, stats.lookup_failures
    );
    info!("👋 {} API shutdown complete", APP_NAME);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
