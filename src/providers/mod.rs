//! Providers Module - External Data Sources
//!
//! Currently a single Etherscan-compatible block explorer client.

pub mod explorer;

pub use explorer::*;
