//! Models Module - Data Structures & Configuration
//!
//! Shared types, error codes and environment-driven configuration.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
