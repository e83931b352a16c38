//! Error types used throughout the client layer

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced by HTTP request execution and everything layered on it.
///
/// The variant encodes the failure class; `status()` recovers the HTTP
/// status code (0 for failures that never produced a response). The type is
/// `Clone` because a single settled request is fanned out to every caller
/// that was deduplicated onto it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, TLS, or a dropped connection.
    /// No HTTP response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a 5xx status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server answered with a non-auth 4xx status.
    #[error("request rejected ({status}): {message}")]
    Client { status: u16, message: String },

    /// The server answered 401 or 403.
    #[error("authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// The response body could not be decoded as the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Rejected locally before any network call was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// Client construction or configuration failure.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Classifies an HTTP status code, carrying the server-provided message.
    ///
    /// 401/403 map to [`ApiError::Auth`], other 4xx to [`ApiError::Client`],
    /// and 5xx to [`ApiError::Server`]. Statuses outside those ranges are
    /// treated as server faults so they stay retryable.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Auth { status, message },
            400..=499 => Self::Client { status, message },
            _ => Self::Server { status, message },
        }
    }

    /// The HTTP status code behind this error, or 0 when no response was
    /// received (network failures and local rejections).
    pub fn status(&self) -> u16 {
        match self {
            Self::Server { status, .. }
            | Self::Client { status, .. }
            | Self::Auth { status, .. } => *status,
            Self::Network(_) | Self::Decode(_) | Self::Validation(_) | Self::Config(_) => 0,
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Only transport failures (status 0) and 5xx responses qualify; client
    /// errors, auth failures, and local rejections are deterministic.
    pub fn should_retry(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. })
    }

    /// Whether this error signals a broken or rejected session (401/403).
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

/// Main error type for non-HTTP failures in the client layer.
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FleetError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for FleetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for FleetError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result type alias for Fleetline operations
pub type Result<T> = std::result::Result<T, FleetError>;
