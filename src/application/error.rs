//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures that can occur during use case execution,
//! including validation failures, business rule violations, and backend
//! communication errors.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)  - Business rule violations
//! ├── Api(ApiError)        - Backend communication failures
//! ├── Validation(String)   - Input validation failures
//! ├── NotFound(String)     - Resource not found
//! ├── Unauthorized         - Caller lacks permission
//! └── ... (specific error variants)
//! ```
//!
//! # Examples
//!
//! ```
//! use recimat::application::error::ApplicationError;
//!
//! // Create validation error
//! let err = ApplicationError::validation("quantity must be positive");
//!
//! // Create not found error
//! let err = ApplicationError::not_found("Proposal", "M2-LST-20240101-A7K2");
//! assert!(err.is_not_found());
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::api::error::ApiError;
use thiserror::Error;

/// Application layer error.
///
/// Wraps domain and backend errors with application-specific context for
/// use case execution failures.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Backend communication error.
    #[error("backend error: {0}")]
    Api(#[from] ApiError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// Caller lacks permission for the operation.
    #[error("unauthorized")]
    Unauthorized,

    /// User not found.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Email address already registered.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// Proposal not found.
    #[error("proposal not found: {0}")]
    ProposalNotFound(String),

    /// Response not found.
    #[error("response not found: {0}")]
    ResponseNotFound(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    /// Creates a user not found error.
    #[must_use]
    pub fn user_not_found(user_id: impl Into<String>) -> Self {
        Self::UserNotFound(user_id.into())
    }

    /// Creates a duplicate email error.
    #[must_use]
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail(email.into())
    }

    /// Creates a proposal not found error.
    #[must_use]
    pub fn proposal_not_found(id: impl Into<String>) -> Self {
        Self::ProposalNotFound(id.into())
    }

    /// Creates a response not found error.
    #[must_use]
    pub fn response_not_found(id: impl Into<String>) -> Self {
        Self::ResponseNotFound(id.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::UserNotFound(_)
                | Self::ProposalNotFound(_)
                | Self::ResponseNotFound(_)
        )
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an authorization error.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
