//! Error types for the Herald SDK

use herald_gateway_client::GatewayError;
use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK error types
#[derive(Error, Debug)]
pub enum SdkError {
    /// A record failed structural validation (bad enum member, missing
    /// inline content, empty signature...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The gateway could not accept the submission
    #[error("Broadcast error at {endpoint} (status {status:?}): {message}")]
    Broadcast {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    /// The gateway validator rejected the message (HTTP 422)
    #[error("Invalid message rejected at {endpoint}: {message}")]
    InvalidMessage {
        endpoint: String,
        message: String,
        detail: Option<serde_json::Value>,
    },

    /// The signer failed to produce a signature
    #[error("Signing error: {0}")]
    Signing(String),

    /// Message not found
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Message was removed by a forget message
    #[error("Message {item_hash} was forgotten by {forgotten_by:?}")]
    ForgottenMessage {
        item_hash: String,
        forgotten_by: Vec<String>,
    },

    /// Message was rejected by the network
    #[error("Message {item_hash} was rejected")]
    RejectedMessage {
        item_hash: String,
        detail: Option<serde_json::Value>,
    },

    /// Query on the read API failed
    #[error("Query error: {0}")]
    Query(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Gateway error passed through unchanged
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl SdkError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        SdkError::Validation(message.into())
    }

    /// Whether this error belongs to the broadcast family
    pub fn is_broadcast_error(&self) -> bool {
        matches!(self, SdkError::Broadcast { .. } | SdkError::InvalidMessage { .. })
    }

    /// HTTP status attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Broadcast { status, .. } => *status,
            SdkError::InvalidMessage { .. } => Some(422),
            SdkError::Gateway(err) => err.status(),
            _ => None,
        }
    }

    /// Classify a failed push to a storage engine
    pub(crate) fn from_push(err: GatewayError, endpoint: &str) -> Self {
        match err {
            GatewayError::Status {
                status,
                endpoint,
                message,
                ..
            } => SdkError::Broadcast {
                endpoint,
                status: Some(status),
                message,
            },
            other => SdkError::Broadcast {
                endpoint: endpoint.to_string(),
                status: other.status(),
                message: other.to_string(),
            },
        }
    }

    /// Classify a gateway error raised by a submission endpoint
    ///
    /// 422 becomes [`SdkError::InvalidMessage`] and an undecodable reply
    /// becomes [`SdkError::Broadcast`]; everything else is kept as is.
    pub(crate) fn from_submission(err: GatewayError) -> Self {
        match err {
            GatewayError::Status {
                status: 422,
                endpoint,
                message,
                detail,
            } => SdkError::InvalidMessage {
                endpoint,
                message,
                detail,
            },
            GatewayError::MalformedReply {
                status,
                endpoint,
                message,
            } => SdkError::Broadcast {
                endpoint,
                status: Some(status),
                message,
            },
            other => SdkError::Gateway(other),
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}
