//! Error types for rekap.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rekap operations.
pub type Result<T> = std::result::Result<T, RekapError>;

/// Errors that can occur during rekap operations.
#[derive(Error, Debug)]
pub enum RekapError {
    #[error(
        "uv not found. Install it first: https://docs.astral.sh/uv/getting-started/installation/"
    )]
    UvNotFound,

    #[error("uv sync failed: {0}")]
    SyncFailed(String),

    #[error("Virtual environment not found at {}. Run 'uv sync' again.", .0.display())]
    VenvMissing(PathBuf),

    #[error("Failed to start {program}: {source}")]
    LaunchFailed {
        program: String,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Audit queue error: {0}")]
    Queue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl RekapError {
    /// Whether this error came from one of the launcher's precondition gates.
    ///
    /// Gate failures pause before exiting so the message stays readable when
    /// the launcher was started by double-clicking.
    pub fn is_gate_failure(&self) -> bool {
        matches!(
            self,
            RekapError::UvNotFound
                | RekapError::SyncFailed(_)
                | RekapError::VenvMissing(_)
                | RekapError::LaunchFailed { .. }
        )
    }
}
