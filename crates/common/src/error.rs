//! Error types shared across MotionScreen crates.

use std::path::PathBuf;

/// Top-level error type for MotionScreen operations.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Frame ingest error: {message}")]
    Ingest { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using MotionError.
pub type MotionResult<T> = Result<T, MotionError>;

impl MotionError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::Ingest {
            message: msg.into(),
        }
    }

    /// Whether this error came from invalid configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
