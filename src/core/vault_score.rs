//! VaultScore Module
//! Computes a bounded 0-100 trust score for a scanned entity
//!
//! Higher is better (opposite of a risk score):
//! - 80-100: Excellent
//! - 60-79: Good
//! - 40-59: Fair
//! - 20-39: Poor
//! - 0-19: Very Poor
//!
//! Scoring starts at 100 and applies flat point adjustments. Every adjustment
//! is plain addition on one accumulator, so rule order never changes the result.

use serde::{Deserialize, Serialize};

use super::classifier::EntityType;

/// Starting point before any adjustment
pub const BASE_SCORE: i32 = 100;

pub const MAX_SCORE: u8 = 100;

// Base signal thresholds
pub const SUSPICIOUS_TX_THRESHOLD: u32 = 10;
pub const LOW_HOLDER_THRESHOLD: u64 = 100;
pub const RUG_PULL_RISK_THRESHOLD: f64 = 0.7;

// Token thresholds
pub const LOW_MARKET_CAP: f64 = 1_000_000.0;
pub const LOW_VOLUME_24H: f64 = 10_000.0;
pub const PRICE_CRASH_PERCENT: f64 = -20.0;

// Company thresholds
pub const MAX_RED_FLAGS: usize = 2;
pub const MIN_GREEN_FLAGS: usize = 3;

// Deep scan thresholds
pub const SUSPICIOUS_PATTERN_THRESHOLD: u32 = 3;
pub const HIGH_VALUE_RECEIVED: f64 = 1_000_000.0;
pub const HIGH_UNIQUE_INTERACTIONS: u32 = 100;
pub const HIGH_CONTRACT_INTERACTIONS: u32 = 50;

/// Market signals, only consulted for tokens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetrics {
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub price_change_24h_percent: Option<f64>,
}

/// Due-diligence flags, only consulted for companies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub green_flags: Vec<String>,
}

/// Signals from the secondary on-chain analysis pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeepScanSignals {
    pub suspicious_pattern_count: u32,
    /// Native currency units
    pub total_value_received: f64,
    pub unique_interaction_count: u32,
    pub contract_interaction_count: u32,
}

/// Everything the calculator looks at for one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanInput {
    pub entity_type: EntityType,
    pub suspicious_transaction_count: u32,
    pub contract_verified: bool,
    pub liquidity_locked: bool,
    pub holder_count: u64,
    /// Estimated likelihood of a liquidity pull, 0.0 - 1.0
    pub rug_pull_risk: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_scan: Option<DeepScanSignals>,
}

impl ScanInput {
    pub fn with_token(mut self, token: TokenMetrics) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_company(mut self, company: CompanyProfile) -> Self {
        self.company = Some(company);
        self
    }

    pub fn with_deep_scan(mut self, deep_scan: DeepScanSignals) -> Self {
        self.deep_scan = Some(deep_scan);
        self
    }
}

/// Five-tier label derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl ScoreLabel {
    pub const ALL: [ScoreLabel; 5] = [
        ScoreLabel::Excellent,
        ScoreLabel::Good,
        ScoreLabel::Fair,
        ScoreLabel::Poor,
        ScoreLabel::VeryPoor,
    ];

    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ScoreLabel::Excellent,
            60..=79 => ScoreLabel::Good,
            40..=59 => ScoreLabel::Fair,
            20..=39 => ScoreLabel::Poor,
            _ => ScoreLabel::VeryPoor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "Excellent",
            ScoreLabel::Good => "Good",
            ScoreLabel::Fair => "Fair",
            ScoreLabel::Poor => "Poor",
            ScoreLabel::VeryPoor => "Very Poor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "Highly trustworthy with minimal risk",
            ScoreLabel::Good => "Generally safe with some considerations",
            ScoreLabel::Fair => "Exercise caution and do thorough research",
            ScoreLabel::Poor => "High risk, avoid or use extreme caution",
            ScoreLabel::VeryPoor => "Severe risk indicators, avoid interaction",
        }
    }

    /// Get color code for UI
    pub fn color_code(&self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "#22c55e", // Green
            ScoreLabel::Good => "#eab308",      // Yellow
            ScoreLabel::Fair => "#f97316",      // Orange
            ScoreLabel::Poor => "#ef4444",      // Red
            ScoreLabel::VeryPoor => "#7c2d12",  // Dark red
        }
    }
}

/// One rule that fired during scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    pub rule: String,
    pub points: i32,
    pub reason: String,
}

/// Final VaultScore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub label: ScoreLabel,
    /// Adjustments in evaluation order
    pub breakdown: Vec<ScoreAdjustment>,
}

impl ScoreResult {
    /// Sum of all adjustments before clamping
    pub fn raw_total(&self) -> i32 {
        BASE_SCORE + self.breakdown.iter().map(|a| a.points).sum::<i32>()
    }
}

/// Collects adjustments and clamps the total
struct Accumulator {
    adjustments: Vec<ScoreAdjustment>,
}

impl Accumulator {
    fn new() -> Self {
        Self { adjustments: Vec::new() }
    }

    fn apply(&mut self, condition: bool, rule: &str, points: i32, reason: impl FnOnce() -> String) {
        if condition {
            self.adjustments.push(ScoreAdjustment {
                rule: rule.to_string(),
                points,
                reason: reason(),
            });
        }
    }

    fn finish(self) -> ScoreResult {
        let raw: i32 = BASE_SCORE + self.adjustments.iter().map(|a| a.points).sum::<i32>();
        let score = raw.clamp(0, MAX_SCORE as i32) as u8;

        ScoreResult {
            score,
            label: ScoreLabel::from_score(score),
            breakdown: self.adjustments,
        }
    }
}

/// Compute the VaultScore for one scan. Pure and total.
pub fn compute_vault_score(input: &ScanInput) -> ScoreResult {
    let mut acc = Accumulator::new();

    acc.apply(
        input.suspicious_transaction_count > SUSPICIOUS_TX_THRESHOLD,
        "suspicious_transactions",
        -25,
        || format!("{} suspicious transactions", input.suspicious_transaction_count),
    );
    acc.apply(!input.contract_verified, "contract_unverified", -20, || {
        "Contract source is not verified".to_string()
    });
    acc.apply(!input.liquidity_locked, "liquidity_unlocked", -15, || {
        "Liquidity is not locked".to_string()
    });
    acc.apply(input.holder_count < LOW_HOLDER_THRESHOLD, "low_holder_count", -10, || {
        format!("Only {} holders", input.holder_count)
    });
    acc.apply(input.rug_pull_risk > RUG_PULL_RISK_THRESHOLD, "rug_pull_risk", -30, || {
        format!("Rug pull risk {:.0}%", input.rug_pull_risk * 100.0)
    });

    if input.entity_type == EntityType::Token {
        if let Some(token) = &input.token {
            if let Some(market_cap) = token.market_cap {
                acc.apply(market_cap < LOW_MARKET_CAP, "low_market_cap", -10, || {
                    format!("Market cap ${:.0}", market_cap)
                });
            }
            if let Some(volume) = token.volume_24h {
                acc.apply(volume < LOW_VOLUME_24H, "low_volume_24h", -5, || {
                    format!("24h volume ${:.0}", volume)
                });
            }
            if let Some(change) = token.price_change_24h_percent {
                acc.apply(change < PRICE_CRASH_PERCENT, "price_crash_24h", -15, || {
                    format!("Price moved {:.1}% in 24h", change)
                });
            }
        }
    }

    if input.entity_type == EntityType::Company {
        if let Some(company) = &input.company {
            acc.apply(company.red_flags.len() > MAX_RED_FLAGS, "red_flags", -20, || {
                format!("{} red flags: {}", company.red_flags.len(), company.red_flags.join(", "))
            });
            acc.apply(company.green_flags.len() < MIN_GREEN_FLAGS, "few_green_flags", -10, || {
                format!("Only {} green flags", company.green_flags.len())
            });
        }
    }

    if let Some(deep) = &input.deep_scan {
        acc.apply(
            deep.suspicious_pattern_count > SUSPICIOUS_PATTERN_THRESHOLD,
            "suspicious_patterns",
            -15,
            || format!("{} suspicious patterns", deep.suspicious_pattern_count),
        );
        acc.apply(deep.total_value_received > HIGH_VALUE_RECEIVED, "high_value_received", 5, || {
            format!("Received {:.2} in total", deep.total_value_received)
        });
        acc.apply(
            deep.unique_interaction_count > HIGH_UNIQUE_INTERACTIONS,
            "many_unique_interactions",
            3,
            || format!("{} unique counterparties", deep.unique_interaction_count),
        );
        acc.apply(
            deep.contract_interaction_count > HIGH_CONTRACT_INTERACTIONS,
            "many_contract_interactions",
            2,
            || format!("{} contract interactions", deep.contract_interaction_count),
        );
    }

    acc.finish()
}
