//! Entity-Type Classifier
//!
//! Maps a raw scanner query to the kind of entity being scanned.
//! Rules are evaluated in a fixed priority order, first match wins:
//! 1. `0x` prefix and exactly 42 characters → Address
//! 2. contains "nft" / "collection"        → Nft
//! 3. contains "coin" / "token"            → Token
//! 4. contains "inc" / "ltd" / "corp"      → Company
//! 5. anything else                        → Project

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a hex-encoded EVM address including the `0x` prefix
pub const EVM_ADDRESS_LEN: usize = 42;

const NFT_KEYWORDS: [&str; 2] = ["nft", "collection"];
const TOKEN_KEYWORDS: [&str; 2] = ["coin", "token"];
const COMPANY_KEYWORDS: [&str; 3] = ["inc", "ltd", "corp"];

/// Kind of entity a VaultScore is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Address,
    Token,
    Company,
    Nft,
    Project,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Address,
        EntityType::Token,
        EntityType::Company,
        EntityType::Nft,
        EntityType::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Address => "address",
            EntityType::Token => "token",
            EntityType::Company => "company",
            EntityType::Nft => "nft",
            EntityType::Project => "project",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "address" => Ok(EntityType::Address),
            "token" => Ok(EntityType::Token),
            "company" => Ok(EntityType::Company),
            "nft" => Ok(EntityType::Nft),
            "project" => Ok(EntityType::Project),
            other => Err(format!("Unknown entity type: {}", other)),
        }
    }
}

/// Classify a free-text query. Never fails; unknown input falls back to `Project`.
pub fn classify_entity(query: &str) -> EntityType {
    // Length is counted in UTF-16 units so non-ASCII queries line up with the web scanner
    if query.starts_with("0x") && query.encode_utf16().count() == EVM_ADDRESS_LEN {
        return EntityType::Address;
    }

    let lower = query.to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if contains_any(&NFT_KEYWORDS) {
        EntityType::Nft
    } else if contains_any(&TOKEN_KEYWORDS) {
        EntityType::Token
    } else if contains_any(&COMPANY_KEYWORDS) {
        EntityType::Company
    } else {
        EntityType::Project
    }
}
