//! Error types for warden-store

use thiserror::Error;

/// Result type alias for warden-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in warden-store
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Document or account does not exist
    #[error("{collection}/{id} not found")]
    NotFound {
        /// Collection (or "accounts" for the identity provider)
        collection: &'static str,
        /// Document ID or key
        id: String,
    },

    /// A document or account with the same key already exists
    #[error("{collection}/{id} already exists")]
    AlreadyExists {
        /// Collection (or "accounts" for the identity provider)
        collection: &'static str,
        /// Conflicting key
        id: String,
    },

    /// The backend refused the input (e.g. weak password)
    #[error("Rejected: {0}")]
    Rejected(String),

    /// The backend failed
    #[error("Backend error: {0}")]
    Backend(String),

    /// Error from warden-core
    #[error("Core error: {0}")]
    Core(#[from] warden_core::Error),
}

impl Error {
    /// Creates a not-found error.
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            collection,
            id: id.into(),
        }
    }

    /// Creates an already-exists error.
    pub fn already_exists(collection: &'static str, id: impl Into<String>) -> Self {
        Error::AlreadyExists {
            collection,
            id: id.into(),
        }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Error::Backend(message.into())
    }

    /// Returns whether the operation may succeed if retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Backend(_))
    }
}
