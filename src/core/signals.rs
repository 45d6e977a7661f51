//! Transaction Signal Extraction
//!
//! Turns an explorer transaction list into the on-chain signals the VaultScore
//! calculator consumes for address scans.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::vault_score::DeepScanSignals;
use crate::models::types::TransactionRecord;

/// Outbound transactions inside this window count as one burst
pub const BURST_WINDOW_SECS: i64 = 60;
/// Minimum outbound transactions for a burst
pub const BURST_MIN_TXS: usize = 5;
/// Failure-heavy history needs at least this many failures...
pub const FAILURE_PATTERN_MIN: usize = 4;
/// ...and this share of all transactions
pub const FAILURE_PATTERN_RATIO: f64 = 0.25;

/// Signals derived from one address's history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionSignals {
    pub transaction_count: usize,
    pub suspicious_transaction_count: u32,
    pub deep_scan: DeepScanSignals,
}

impl TransactionSignals {
    /// Extract signals for `address` (case-insensitive) from its transaction list
    pub fn from_transactions(address: &str, transactions: &[TransactionRecord]) -> Self {
        let mut total_value_received = 0.0;
        let mut counterparties: HashSet<String> = HashSet::new();
        let mut poisoning_senders: HashSet<String> = HashSet::new();
        let mut contract_interactions = 0u32;
        let mut suspicious = 0u32;
        let mut failures = 0usize;

        for tx in transactions {
            let inbound = tx.is_to(address);
            let outbound = tx.is_from(address);

            let counterparty = if outbound { &tx.to } else { &tx.from };
            if !counterparty.is_empty() && !counterparty.eq_ignore_ascii_case(address) {
                counterparties.insert(counterparty.to_ascii_lowercase());
            }

            if tx.has_calldata() || tx.is_contract_creation() {
                contract_interactions += 1;
            }

            if tx.is_failed() {
                failures += 1;
                suspicious += 1;
                continue;
            }

            if inbound && !outbound {
                let value = tx.value_wei();
                if value.is_zero() && !tx.has_calldata() {
                    // Zero-value dust from a lookalike sender
                    suspicious += 1;
                    poisoning_senders.insert(tx.from.to_ascii_lowercase());
                } else {
                    total_value_received += tx.value_native();
                }
            }
        }

        let mut patterns = poisoning_senders.len() + count_outbound_bursts(address, transactions);
        if failures >= FAILURE_PATTERN_MIN
            && failures as f64 / transactions.len() as f64 > FAILURE_PATTERN_RATIO
        {
            patterns += 1;
        }

        Self {
            transaction_count: transactions.len(),
            suspicious_transaction_count: suspicious,
            deep_scan: DeepScanSignals {
                suspicious_pattern_count: saturating_u32(patterns),
                total_value_received,
                unique_interaction_count: saturating_u32(counterparties.len()),
                contract_interaction_count: contract_interactions,
            },
        }
    }
}

/// Non-overlapping windows of `BURST_MIN_TXS` outbound transactions within `BURST_WINDOW_SECS`
fn count_outbound_bursts(address: &str, transactions: &[TransactionRecord]) -> usize {
    let mut times: Vec<i64> = transactions
        .iter()
        .filter(|tx| tx.is_from(address))
        .filter_map(|tx| tx.timestamp_secs())
        .collect();
    times.sort_unstable();

    let mut bursts = 0;
    let mut start = 0;
    while start + BURST_MIN_TXS <= times.len() {
        let end = start + BURST_MIN_TXS - 1;
        if times[end].saturating_sub(times[start]) <= BURST_WINDOW_SECS {
            bursts += 1;
            start = end + 1;
        } else {
            start += 1;
        }
    }
    bursts
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
