//! Error types for the chat client.

use thiserror::Error;

/// Chat client error type.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid backend URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder when it could not be read.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Session storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Result type alias for chat client operations.
pub type Result<T> = std::result::Result<T, Error>;
