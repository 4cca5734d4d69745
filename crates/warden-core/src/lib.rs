//! Warden Core: shared types, errors, and the document model.
//!
//! This crate sits directly above `warden-authz` and below every
//! collaborator crate.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`ids`]: Identifier newtypes for users and tasks
//! - [`model`]: Stored documents (users, settings, tasks, metrics)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ids;
pub mod model;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use ids::{TaskId, UserId};
pub use model::{
    CompletionStats, MetricPeriod, MetricRecord, Task, TaskStatus, Theme, UserRecord,
    UserSettings,
};

// The role type travels with every user document
pub use warden_authz::Role;
