//! Error types for facilitator interactions
//!
//! Every failure of a facilitator call maps to exactly one [`X402Error`]
//! variant. Network, status and body failures are kept apart so callers can
//! decide for themselves whether a call is worth retrying.

use crate::facilitator::Endpoint;
use http::StatusCode;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, X402Error>;

/// Errors produced by the facilitator client
#[derive(Error, Debug)]
pub enum X402Error {
    /// The request envelope could not be serialized to JSON
    #[error("Failed to serialize {endpoint} request body: {source}")]
    Serialization {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP request could not be constructed (e.g. malformed URL)
    #[error("Failed to build {endpoint} request: {source}")]
    RequestBuild {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    /// The request was sent but the exchange failed (DNS, connect, TLS, timeout)
    #[error("Failed to send {endpoint} request: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    /// The facilitator answered with something other than `200 OK`
    #[error("Facilitator {endpoint} failed with status: {status}. Response: {body}")]
    UnexpectedStatus {
        endpoint: Endpoint,
        status: StatusCode,
        body: String,
    },

    /// A `200 OK` body did not decode into the expected response shape
    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    /// Client or transport configuration is invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl X402Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The facilitator endpoint involved, if the error came from a call
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Serialization { endpoint, .. }
            | Self::RequestBuild { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::UnexpectedStatus { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }

    /// HTTP status returned by the facilitator, for non-200 responses
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the call failed because the configured timeout elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }
}
