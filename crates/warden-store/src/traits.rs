//! Collaborator traits.
//!
//! The document store owns `users`, `userSettings`, `tasks`, and the metric
//! collections; the identity provider owns accounts and their session
//! claims. Neither is implemented by Warden itself beyond the in-memory
//! versions in [`crate::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use warden_core::{MetricPeriod, MetricRecord, Role, Task, TaskId, TaskStatus, UserId, UserRecord, UserSettings};

use crate::error::Result;
use crate::events::StoreEvent;
use crate::query::TaskQuery;

/// `users/{uid}` documents.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user document.
    async fn get_user(&self, uid: &UserId) -> Result<Option<UserRecord>>;

    /// Create a user document. Fails if one already exists for `uid`.
    ///
    /// Emits [`StoreEvent::UserCreated`].
    async fn create_user(&self, uid: &UserId, record: UserRecord) -> Result<()>;

    /// Change the role on an existing document and bump `updatedAt`.
    async fn update_role(&self, uid: &UserId, role: Role, now: DateTime<Utc>) -> Result<()>;

    /// Delete a user document. Returns the deleted document, if there was one.
    ///
    /// Emits [`StoreEvent::UserDeleted`] when a document was removed.
    async fn delete_user(&self, uid: &UserId) -> Result<Option<UserRecord>>;

    /// Every user document.
    async fn list_users(&self) -> Result<Vec<(UserId, UserRecord)>>;

    /// Whether any user currently holds `role`.
    async fn any_with_role(&self, role: Role) -> Result<bool>;
}

/// `userSettings/{uid}` documents.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch settings.
    async fn get_settings(&self, uid: &UserId) -> Result<Option<UserSettings>>;

    /// Write settings, replacing any existing document.
    async fn put_settings(&self, uid: &UserId, settings: UserSettings) -> Result<()>;

    /// Delete settings. Deleting a missing document is not an error.
    async fn delete_settings(&self, uid: &UserId) -> Result<()>;
}

/// `tasks/{id}` documents.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Write a task, replacing any existing document with the same ID.
    async fn put_task(&self, task: Task) -> Result<()>;

    /// Fetch a task.
    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>>;

    /// Tasks matching `query`, in ID order.
    async fn find_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>>;

    /// Set the status of an existing task.
    async fn set_task_status(&self, id: &TaskId, status: TaskStatus) -> Result<()>;

    /// Delete a task.
    async fn delete_task(&self, id: &TaskId) -> Result<()>;
}

/// Append-only metric collections.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Append a record to its period's collection. Returns the new document ID.
    async fn add_metric(&self, record: MetricRecord) -> Result<String>;

    /// Every record written for `period`.
    async fn list_metrics(&self, period: MetricPeriod) -> Result<Vec<MetricRecord>>;
}

/// Source of document lifecycle events.
pub trait EventSource: Send + Sync {
    /// Subscribe to events emitted after this call.
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

/// Everything the account and job services need from the document store.
pub trait DocumentStore: UserStore + SettingsStore + TaskStore + MetricsStore + EventSource {}

impl<T> DocumentStore for T where T: UserStore + SettingsStore + TaskStore + MetricsStore + EventSource {}

// ============================================================================
// Identity provider
// ============================================================================

/// Request to create a sign-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Sign-in email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Whether the email is marked verified at creation.
    pub email_verified: bool,
}

/// A sign-in account as seen by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAccount {
    /// Account uid.
    pub uid: UserId,
    /// Sign-in email.
    pub email: String,
    /// Whether the email is verified.
    pub email_verified: bool,
    /// `role` custom claim, carried into new sessions.
    pub role_claim: Option<Role>,
}

/// Accounts and session claims.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account. Fails with `AlreadyExists` if the email is taken.
    async fn create_account(&self, account: NewAccount) -> Result<IdentityAccount>;

    /// Fetch an account.
    async fn get_account(&self, uid: &UserId) -> Result<Option<IdentityAccount>>;

    /// Set the `role` custom claim. Takes effect on the user's next sign-in
    /// or token refresh.
    async fn set_role_claim(&self, uid: &UserId, role: Role) -> Result<()>;

    /// Delete an account. Fails with `NotFound` if there is none.
    async fn delete_account(&self, uid: &UserId) -> Result<()>;
}
