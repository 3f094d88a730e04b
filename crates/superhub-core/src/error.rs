//! Error types for SuperHub operations.
//!
//! Every failure the pipeline can produce surfaces to the caller as one
//! variant of [`Error`]. Nothing is retried or swallowed on the way.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for SuperHub operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The configured base URL (or an endpoint joined onto it) is not a usable URL
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    /// Dispatching the request failed before a response arrived
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The API rejected the request with a structured 4xx error body
    #[error("{0}")]
    Request(ErrorResponse),

    /// A 4xx response whose body could not be read as an [`ErrorResponse`]
    #[error("Unsuccessful HTTP status: {0}")]
    UnsuccessfulStatus(StatusCode),

    /// The API failed with a 5xx status; the body is never inspected
    #[error("Internal server error: {0}")]
    ServerFault(StatusCode),

    /// The response declared a body type this client does not decode
    #[error("Unsupported content type: {0:?}")]
    UnsupportedContentType(String),

    /// The response body did not match the expected shape
    #[error("Failed to decode response body as {target}: {source}")]
    Decode {
        /// Name of the type the body was decoded into
        target: &'static str,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be encoded
    #[error("Failed to encode request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A value was expected but the response carried no body
    #[error("Response carried no body")]
    EmptyResponse,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Specialized result type for SuperHub operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the API alongside 4xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error name (e.g. `Not Found`)
    #[serde(rename = "error")]
    pub name: String,
    /// Human-readable message
    pub message: String,
    /// Request path the error refers to
    pub path: String,
    /// HTTP status code echoed by the server
    pub status: u16,
    /// Server-side time of the failure
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request error: {} ({}) on path {}: {}",
            self.status, self.name, self.path, self.message
        )
    }
}

impl std::error::Error for ErrorResponse {}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedUrl(_) => "MALFORMED_URL",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Request(_) => "REQUEST_ERROR",
            Self::UnsuccessfulStatus(_) => "UNSUCCESSFUL_STATUS",
            Self::ServerFault(_) => "SERVER_FAULT",
            Self::UnsupportedContentType(_) => "UNSUPPORTED_CONTENT_TYPE",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::Serialize(_) => "SERIALIZE_ERROR",
            Self::EmptyResponse => "EMPTY_RESPONSE",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// HTTP status associated with the error, when a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(response) => Some(response.status),
            Self::UnsuccessfulStatus(status) | Self::ServerFault(status) => Some(status.as_u16()),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Returns true for 4xx outcomes, structured or not.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Request(_) | Self::UnsuccessfulStatus(_))
    }

    /// Returns true for 5xx outcomes.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        matches!(self, Self::ServerFault(_))
    }

    /// The structured API error, if the server sent one.
    #[must_use]
    pub const fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Request(response) => Some(response),
            _ => None,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::MalformedUrl(format!("Invalid base URL: {err}"))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(format!("Invalid configuration: {err}"))
    }
}

impl From<ErrorResponse> for Error {
    fn from(response: ErrorResponse) -> Self {
        Self::Request(response)
    }
}
