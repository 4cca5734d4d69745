//! Error types for warden-cli

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for warden-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in warden-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Configuration could not be resolved, parsed or rendered.
    #[error("Config error: {0}")]
    Config(String),

    /// Filesystem error at a known path.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid `[permissions]` table.
    #[error("Permissions error: {0}")]
    Permissions(#[from] warden_authz::AuthzError),

    /// The HTTP server could not bind or failed while serving.
    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),

    /// The server could not be reached.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("Server returned {status}: {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Job setup or execution failed.
    #[error("Job error: {0}")]
    Jobs(#[from] warden_jobs::Error),
}

impl Error {
    /// Config error from any message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Attach `path` to an I/O error.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
