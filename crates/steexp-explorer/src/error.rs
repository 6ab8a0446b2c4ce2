//! Error types for the explorer core

use std::path::PathBuf;

use thiserror::Error;

/// Result type for explorer setup operations
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Errors raised while setting up the explorer
///
/// Fetch failures are not here; they travel inside `LoadState::Failed`.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Anchor table is malformed: {0}")]
    AnchorTable(#[from] serde_json::Error),

    #[error("Cannot read anchor table {path}: {source}")]
    AnchorFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Horizon client error: {0}")]
    Horizon(#[from] steexp_horizon::HorizonError),
}
