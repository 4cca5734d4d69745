//! Error types for warden-jobs

use thiserror::Error;

/// Result type alias for warden-jobs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a job before any unit of work runs
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// No job has this name
    #[error("Unknown job: '{0}'")]
    UnknownJob(String),

    /// The configured time zone is not an IANA zone name
    #[error("Invalid time zone: '{0}'")]
    InvalidTimeZone(String),

    /// The job's initial query failed
    #[error("Store error: {0}")]
    Store(#[from] warden_store::Error),
}
