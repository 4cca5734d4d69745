//! Document lifecycle events.
//!
//! Emitted by a [`DocumentStore`](crate::DocumentStore) whenever a
//! `users/{uid}` document is created or deleted, mirroring the document
//! triggers of a managed store.

use warden_core::{UserId, UserRecord};

/// Capacity of the event broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A change to a `users/{uid}` document.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A new user document was written.
    UserCreated {
        /// Document ID.
        uid: UserId,
        /// Snapshot of the created document.
        record: UserRecord,
    },
    /// A user document was deleted.
    UserDeleted {
        /// Document ID.
        uid: UserId,
        /// Snapshot of the document before deletion.
        record: UserRecord,
    },
}

impl StoreEvent {
    /// The user the event concerns.
    pub fn uid(&self) -> &UserId {
        match self {
            StoreEvent::UserCreated { uid, .. } | StoreEvent::UserDeleted { uid, .. } => uid,
        }
    }
}
