//! Core Module - Scoring Logic
//!
//! Pure functions only: entity classification, signal extraction and the
//! VaultScore calculator. Nothing in here performs I/O.

pub mod classifier;
pub mod signals;
pub mod vault_score;

pub use classifier::*;
pub use signals::*;
pub use vault_score::*;
