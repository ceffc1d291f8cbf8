//! Error types for four-in-a-row

use thiserror::Error;

/// Result type for four-in-a-row operations
pub type Result<T> = std::result::Result<T, FourError>;

/// Four-in-a-row error types
#[derive(Debug, Error)]
pub enum FourError {
    /// Local identity unusable as a topic level
    #[error("Invalid player name: {0}")]
    InvalidName(String),

    /// Bus I/O failure (connect, read, write)
    #[error("Bus error: {0}")]
    BusError(String),

    /// Bus connection went away mid-session
    #[error("Bus connection lost")]
    ConnectionLost,

    /// Malformed frame or unexpected message on the wire
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Screen could not be drawn
    #[error("Display error: {0}")]
    DisplayError(String),

    /// Keys could not be sampled
    #[error("Input error: {0}")]
    InputError(String),

    /// Bad or missing configuration
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for FourError {
    fn from(err: serde_json::Error) -> Self {
        FourError::SerializationError(err.to_string())
    }
}
