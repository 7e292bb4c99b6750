//! Cogniscript Common Utilities
//!
//! Shared infrastructure for all Cogniscript crates:
//! - Error types and result aliases
//! - Session clock and interval gating for throttled work
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
