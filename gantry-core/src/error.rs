//! Error types for Gantry operations

use thiserror::Error;

/// Result type alias for Gantry operations
pub type Result<T> = std::result::Result<T, GantryError>;

/// Comprehensive error type for all Gantry operations
#[derive(Error, Debug)]
pub enum GantryError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No control plane target has been configured
    #[error("No target configured. Set GANTRY_TARGET or run `gantryctl config set target <url>`")]
    NoTarget,

    /// The control plane rejected a request; `message` carries the
    /// plain-text body it returned
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GantryError {
    fn from(err: serde_json::Error) -> Self {
        GantryError::Serialization(err.to_string())
    }
}
