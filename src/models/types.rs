//! Type definitions for explorer payloads
//! Etherscan-style APIs send every numeric field as a decimal string

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::constants::wei_to_native;

/// Raw explorer envelope: `{status, message, result}`
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub result: serde_json::Value,
}

impl ExplorerEnvelope {
    /// Provider-level failure (`status: "0"`)
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("0")
    }

    /// Etherscan answers an empty history with status 0 and this message
    pub fn is_empty_history(&self) -> bool {
        self.is_error()
            && self
                .message
                .as_deref()
                .map(|m| m.starts_with("No transactions found"))
                .unwrap_or(false)
    }

    /// Best-effort error text from the provider
    pub fn error_text(&self) -> String {
        let message = self.message.clone().unwrap_or_else(|| "NOTOK".to_string());
        match self.result.as_str() {
            Some(detail) if !detail.is_empty() => format!("{}: {}", message, detail),
            _ => message,
        }
    }
}

/// One transaction from `module=account&action=txlist`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub hash: String,
    pub from: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub to: String,
    /// Wei, decimal string
    pub value: String,
    /// Unix seconds, decimal string
    pub time_stamp: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gas_used: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub is_error: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub input: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub contract_address: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub function_name: String,
}

/// Some explorers send `null` instead of omitting a field (e.g. `to` on contract creation)
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl TransactionRecord {
    /// Transferred value in wei; unparseable values count as zero
    pub fn value_wei(&self) -> U256 {
        U256::from_str_radix(self.value.trim(), 10).unwrap_or(U256::ZERO)
    }

    /// Transferred value in native units (ETH, BNB, ...)
    pub fn value_native(&self) -> f64 {
        wei_to_native(self.value_wei())
    }

    pub fn timestamp_secs(&self) -> Option<i64> {
        self.time_stamp.trim().parse().ok()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp_secs()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }

    pub fn gas_used(&self) -> u64 {
        self.gas_used.trim().parse().unwrap_or(0)
    }

    pub fn is_failed(&self) -> bool {
        self.is_error == "1"
    }

    pub fn has_calldata(&self) -> bool {
        !self.input.is_empty() && self.input != "0x"
    }

    pub fn is_contract_creation(&self) -> bool {
        !self.contract_address.is_empty()
    }

    pub fn is_from(&self, address: &str) -> bool {
        self.from.eq_ignore_ascii_case(address)
    }

    pub fn is_to(&self, address: &str) -> bool {
        self.to.eq_ignore_ascii_case(address)
    }
}
