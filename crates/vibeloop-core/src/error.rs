//! Error types for vibeloop-core

use thiserror::Error;

/// Result type alias using vibeloop-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vibeloop-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Request could not be performed or timed out
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Missing, invalid, or expired credentials (401/403 or no local token)
    #[error("Authentication required: {0}")]
    Auth(String),

    /// Input rejected locally before any network call
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Resource missing on the backend (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend rejected the request with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Session persistence error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether the failure is worth a user-facing retry control.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api(_))
    }
}
