//! # Backend API Errors
//!
//! Error types for remote platform backend operations.
//!
//! This module provides error types for the HTTP document store adapter,
//! covering transport failures, backend rejections, and payload decoding.
//!
//! # Examples
//!
//! ```
//! use recimat::infrastructure::api::error::ApiError;
//!
//! let error = ApiError::timeout("Request timed out after 5000ms");
//! assert!(error.is_retryable());
//!
//! let error = ApiError::backend(404, "record not found");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for remote backend operations.
///
/// Represents errors that can occur when reading or writing records on the
/// hosted document store, including network issues, rejected requests, and
/// malformed payloads.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request timed out.
    #[error("backend timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("backend connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Backend answered with a non-success status.
    #[error("backend rejected request ({status}): {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Error message, taken from the response body when present.
        message: String,
    },

    /// Response body did not match the expected record shape.
    #[error("backend decode error: {message}")]
    Decode {
        /// Error message.
        message: String,
    },

    /// The configured base URL or a derived request URL is invalid.
    #[error("invalid backend url: {message}")]
    InvalidUrl {
        /// Error message.
        message: String,
    },

    /// Unknown or unclassified error.
    #[error("backend unknown error: {message}")]
    Unknown {
        /// Error message.
        message: String,
    },
}

impl ApiError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a backend rejection error.
    #[must_use]
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
        }
    }

    /// Creates an unknown error.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Retryable errors are transient and may succeed on a later poll cycle.
    /// Backend rejections count as retryable only for server-side statuses.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } => true,
            Self::Backend { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error is a client error (bad request).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Backend { status, .. } => (400..500).contains(status),
            Self::InvalidUrl { .. } => true,
            _ => false,
        }
    }

    /// Returns the HTTP status code, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for backend operations.
pub type ApiResult<T> = Result<T, ApiError>;
