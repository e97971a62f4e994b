//! Error types for connectors

use jaffle_protocol::ProtocolError;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Failed to initialize connector (e.g., HTTP client creation failed)
    #[error("failed to initialize connector: {0}")]
    Init(String),

    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource definition is invalid
    #[error("invalid resource: {0}")]
    InvalidResource(#[from] ProtocolError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ConnectorError {
    /// Whether the error happened at the request level rather than decoding
    pub fn is_request_error(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}
