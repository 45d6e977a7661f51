//! VaultCore Library
//!
//! Trust scoring for Web3 entities:
//! - Entity-type classification of free-text scanner queries
//! - VaultScore: bounded 0-100 score with a five-tier label
//! - Etherscan-compatible balance and transaction lookups
//! - Signal extraction from an address's transaction history

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::classifier::{classify_entity, EntityType};
pub use crate::core::signals::TransactionSignals;
pub use crate::core::vault_score::{
    compute_vault_score, CompanyProfile, DeepScanSignals, ScanInput, ScoreAdjustment, ScoreLabel,
    ScoreResult, TokenMetrics,
};
pub use models::config::{ExplorerConfig, ServerConfig};
pub use models::errors::{AppError, AppResult, ErrorCode, LookupFailure};
pub use models::types::TransactionRecord;
pub use providers::explorer::ExplorerClient;
pub use utils::format::{format_address, format_number};
pub use utils::telemetry::{TelemetryCollector, TelemetryStats};
