//! MotionScreen Common Utilities
//!
//! Shared infrastructure for all MotionScreen crates:
//! - Error types and result aliases
//! - Engine configuration and its validation
//! - Session clock and analysis tick scheduling
//! - Tracing/logging initialization

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
