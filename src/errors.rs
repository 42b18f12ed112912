/*!
 * Error types for the ppt-translator application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Provider failures are grouped into four classes that drive the retry policy:
 * - `Transient`: network errors, timeouts, rate limits, 5xx (retry with backoff)
 * - `Auth`: missing or rejected credentials, exhausted balance, unknown model or
 *   endpoint (fatal for the whole run)
 * - `Content`: the provider refused the payload (isolate per unit)
 * - `Protocol`: the response could not be mapped back onto the request (never retried)
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure class of a provider error, used to decide how to recover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorClass {
    /// Temporary failure, eligible for retry with backoff
    Transient,
    /// Credential failure, aborts the run
    Auth,
    /// Payload rejected by the provider
    Content,
    /// Response does not match the request shape
    Protocol,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Auth => write!(f, "auth"),
            Self::Content => write!(f, "content"),
            Self::Protocol => write!(f, "protocol"),
        }
    }
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// The request could not be sent or the connection dropped
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request exceeded its per-request timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider refused to translate the payload
    #[error("Content rejected by provider: {0}")]
    ContentRejected(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The response carried a different number of segments than the request
    #[error("Response cardinality mismatch: expected {expected} segments, got {actual}")]
    CardinalityMismatch {
        /// Number of strings sent
        expected: usize,
        /// Number of strings recovered from the response
        actual: usize,
    },
}

impl ProviderError {
    /// Classify this error for retry and recovery decisions
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ConnectionError(_) | Self::Timeout(_) | Self::RateLimitExceeded(_) => {
                ErrorClass::Transient
            }
            Self::ApiError { status_code, .. } if *status_code >= 500 => ErrorClass::Transient,
            // Remaining statuses (404 model, 405 endpoint, 409) fail the same way for every chunk
            Self::ApiError { .. } | Self::AuthenticationError(_) => ErrorClass::Auth,
            Self::ContentRejected(_) => ErrorClass::Content,
            Self::ParseError(_) | Self::CardinalityMismatch { .. } => ErrorClass::Protocol,
        }
    }

    /// Whether the same request may succeed if sent again
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }

    /// Map a non-success HTTP status and its body to a provider error
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            402 => Self::AuthenticationError(format!("insufficient balance: {}", message)),
            408 => Self::Timeout(message),
            429 => Self::RateLimitExceeded(message),
            400 | 413 | 422 => Self::ContentRejected(message),
            _ => Self::ApiError {
                status_code,
                message,
            },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else if let Some(status) = error.status() {
            Self::from_status(status.as_u16(), error.to_string())
        } else {
            Self::ConnectionError(error.to_string())
        }
    }
}

/// Run-level errors that stop a translation pass
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Fatal error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The run was configured with unusable settings
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Errors that can occur while reading or writing presentation archives
#[derive(Error, Debug)]
pub enum PresentationError {
    /// Filesystem error
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive could not be read or written
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A slide part is not well-formed XML
    #[error("XML error in {part}: {message}")]
    Xml {
        /// Archive entry name
        part: String,
        /// Parser message
        message: String,
    },

    /// The file is not a presentation this tool can rewrite
    #[error("Unsupported presentation: {0}")]
    Unsupported(String),
}
