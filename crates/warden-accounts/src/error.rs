//! Error types for warden-accounts

use thiserror::Error;
use warden_authz::AuthzError;

/// Result type alias for account operations
pub type Result<T> = std::result::Result<T, AccountError>;

/// Why an account operation failed.
///
/// The first four variants are the closed set callers see; `Store` covers
/// infrastructure failures that are not the caller's fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccountError {
    /// The caller lacks a session or the privilege for the operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A referenced user does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation conflicts with existing state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request was malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The store or identity provider failed
    #[error("Store error: {0}")]
    Store(String),
}

impl AccountError {
    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AccountError::Unauthorized(message.into())
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AccountError::InvalidInput(message.into())
    }

    /// Short machine-readable category.
    pub fn category(&self) -> &'static str {
        match self {
            AccountError::Unauthorized(_) => "unauthorized",
            AccountError::NotFound(_) => "not_found",
            AccountError::Conflict(_) => "conflict",
            AccountError::InvalidInput(_) => "invalid_input",
            AccountError::Store(_) => "internal",
        }
    }

    /// The message without its category prefix.
    pub fn message(&self) -> &str {
        match self {
            AccountError::Unauthorized(m)
            | AccountError::NotFound(m)
            | AccountError::Conflict(m)
            | AccountError::InvalidInput(m)
            | AccountError::Store(m) => m,
        }
    }
}

impl From<warden_store::Error> for AccountError {
    fn from(err: warden_store::Error) -> Self {
        match err {
            warden_store::Error::NotFound { .. } => AccountError::NotFound(err.to_string()),
            warden_store::Error::AlreadyExists { .. } => AccountError::Conflict(err.to_string()),
            warden_store::Error::Rejected(message) => AccountError::InvalidInput(message),
            other => AccountError::Store(other.to_string()),
        }
    }
}

impl From<AuthzError> for AccountError {
    fn from(err: AuthzError) -> Self {
        AccountError::InvalidInput(err.to_string())
    }
}
