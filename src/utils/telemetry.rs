//! Telemetry Module for VaultCore
//!
//! In-memory counters for the `/v1/stats` endpoint and shutdown logging.
//! Privacy-first: no addresses, queries or scores per entity are kept,
//! only aggregate counts since process start.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::vault_score::ScoreLabel;

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryStats {
    /// Total scores computed
    pub total_scans: u64,
    /// Scores per label (snake_case label name)
    pub scans_by_label: BTreeMap<String, u64>,
    /// Average scoring latency, including explorer lookups (ms)
    pub avg_latency_ms: f64,
    /// Explorer lookups attempted
    pub total_lookups: u64,
    /// Explorer lookups that ended in a LookupFailure
    pub lookup_failures: u64,
    /// Period start timestamp
    pub period_start: u64,
    /// Period end timestamp
    pub period_end: u64,
}

/// Lock-free telemetry collector
pub struct TelemetryCollector {
    total_scans: AtomicU64,
    total_latency_ms: AtomicU64,
    /// Indexed like `ScoreLabel::ALL`
    label_counts: [AtomicU64; 5],
    total_lookups: AtomicU64,
    lookup_failures: AtomicU64,
    session_start: u64,
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self {
            total_scans: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            label_counts: Default::default(),
            total_lookups: AtomicU64::new(0),
            lookup_failures: AtomicU64::new(0),
            session_start: current_timestamp(),
        }
    }

    /// Record one computed VaultScore
    pub fn record_scan(&self, label: ScoreLabel, latency_ms: u64) {
        self.total_scans.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.label_counts[label_index(label)].fetch_add(1, Ordering::Relaxed);
    }

    /// Record one explorer lookup and whether it succeeded
    pub fn record_lookup(&self, success: bool) {
        self.total_lookups.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.lookup_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        let total_scans = self.total_scans.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        let avg_latency_ms = if total_scans > 0 {
            total_latency as f64 / total_scans as f64
        } else {
            0.0
        };

        let scans_by_label = ScoreLabel::ALL
            .iter()
            .zip(self.label_counts.iter())
            .map(|(label, count)| (label_key(*label).to_string(), count.load(Ordering::Relaxed)))
            .collect();

        TelemetryStats {
            total_scans,
            scans_by_label,
            avg_latency_ms,
            total_lookups: self.total_lookups.load(Ordering::Relaxed),
            lookup_failures: self.lookup_failures.load(Ordering::Relaxed),
            period_start: self.session_start,
            period_end: current_timestamp(),
        }
    }
}

fn label_index(label: ScoreLabel) -> usize {
    match label {
        ScoreLabel::Excellent => 0,
        ScoreLabel::Good => 1,
        ScoreLabel::Fair => 2,
        ScoreLabel::Poor => 3,
        ScoreLabel::VeryPoor => 4,
    }
}

/// Same spelling as the serialized label
fn label_key(label: ScoreLabel) -> &'static str {
    match label {
        ScoreLabel::Excellent => "excellent",
        ScoreLabel::Good => "good",
        ScoreLabel::Fair => "fair",
        ScoreLabel::Poor => "poor",
        ScoreLabel::VeryPoor => "very_poor",
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
