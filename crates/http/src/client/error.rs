//! Client error types

use thiserror::Error;
use voltbay_core::CoreError;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Stored credentials are gone or could not be renewed; the user
    /// must log in again
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Input rejected before dispatch
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The payment gateway refused to create an order
    #[error("Payment gateway declined the request: {0}")]
    GatewayDeclined(String),

    /// A 2xx response that does not match the documented schema
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Credential storage failure
    #[error("Credential storage error: {0}")]
    Storage(CoreError),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether this error means the session is no longer usable
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed(_) | Self::SessionExpired(_)
        )
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => Self::Validation(message),
            other => Self::Storage(other),
        }
    }
}
