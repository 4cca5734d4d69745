//! # warden-store
//!
//! Collaborator interfaces for the persistence layer and identity provider,
//! plus an in-memory implementation used by tests and local runs.
//!
//! - [`traits`]: `UserStore`, `SettingsStore`, `TaskStore`, `MetricsStore`,
//!   `IdentityProvider`, and the combined `DocumentStore`
//! - [`query`]: `TaskQuery` filter over task documents
//! - [`events`]: document lifecycle events (`users/{uid}` create/delete)
//! - [`memory`]: `MemoryStore` and `MemoryIdentity`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod events;
pub mod memory;
pub mod query;
pub mod traits;

pub use error::{Error, Result};
pub use events::StoreEvent;
pub use memory::{MemoryIdentity, MemoryStore};
pub use query::TaskQuery;
pub use traits::{
    DocumentStore, EventSource, IdentityAccount, IdentityProvider, MetricsStore, NewAccount,
    SettingsStore, TaskStore, UserStore,
};
