//! Utils Module - Helper Functions & Shared Utilities

pub mod constants;
pub mod format;
pub mod telemetry;

pub use constants::*;
pub use format::*;
pub use telemetry::*;
