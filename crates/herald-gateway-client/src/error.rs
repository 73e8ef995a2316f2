//! Error types for the gateway client

use thiserror::Error;

/// Gateway client error
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Gateway answered with an error status
    #[error("Gateway error {status} at {endpoint}: {message}")]
    Status {
        status: u16,
        endpoint: String,
        message: String,
        /// Response body, when it was JSON
        detail: Option<serde_json::Value>,
    },

    /// Submission endpoint answered with a body that could not be decoded
    #[error("Malformed reply {status} from {endpoint}: {message}")]
    MalformedReply {
        status: u16,
        endpoint: String,
        message: String,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid response from gateway
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } | GatewayError::MalformedReply { status, .. } => Some(*status),
            GatewayError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
