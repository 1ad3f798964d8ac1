//! Error types for the slotboard server.

use slotboard_engine::PlacementError;
use thiserror::Error;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the server.
#[derive(Debug, Error)]
pub enum Error {
    /// Board operation rejected
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
