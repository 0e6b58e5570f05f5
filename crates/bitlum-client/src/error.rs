//! Error types for exchange client operations

use bitlum_auth::AuthError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::envelope::ExchangeError;

/// Errors that can occur while performing an exchange operation
///
/// Each variant names the stage that failed. No stage is retried.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Request variables could not be serialized
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// Credentials were invalid or a request token could not be derived
    #[error("failed to authorize request: {0}")]
    Auth(#[from] AuthError),

    /// HTTP client could not be constructed
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Connection, send, or timeout failure
    #[error("failed to do http request: {0}")]
    Network(#[source] reqwest::Error),

    /// Server answered with anything but 200 OK
    #[error("unexpected response status: {status}")]
    HttpStatus {
        /// Status returned by the server
        status: StatusCode,
    },

    /// Response body could not be read to the end
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    /// Response is not a valid GraphQL envelope or has unexpected shape
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Server reported one or more errors in the envelope
    #[error("exchange error: {error}")]
    Exchange {
        /// Errors reported by the server
        error: ExchangeError,
        /// Raw value of the operation's data field, when the server sent one
        partial: Option<serde_json::Value>,
    },

    /// Operation argument rejected before sending
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Environment variable not set
    #[error("environment variable not set: {0}")]
    EnvVarNotSet(String),
}

impl ClientError {
    /// Check if this error happened before a response was received
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// HTTP status of a rejected response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatus { status } => Some(*status),
            Self::Network(e) | Self::BodyRead(e) => e.status(),
            _ => None,
        }
    }

    /// Errors reported by the exchange, if that is what failed
    pub fn exchange_error(&self) -> Option<&ExchangeError> {
        match self {
            Self::Exchange { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Decode the partial data the exchange returned alongside its errors
    ///
    /// Returns `None` when this is not an exchange error, when no data was
    /// returned, or when the data does not fit `T`.
    pub fn partial_data<T: DeserializeOwned>(&self) -> Option<T> {
        match self {
            Self::Exchange {
                partial: Some(value),
                ..
            } => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
