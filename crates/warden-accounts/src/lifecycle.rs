//! Reactions to `users/{uid}` lifecycle events.
//!
//! [`LifecycleHooks`] provisions settings when a user document appears and
//! cascades the removal of a user's data when it disappears.
//! [`TriggerRunner`] feeds store events into those hooks.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use warden_core::{TaskId, UserId, UserRecord, UserSettings};
use warden_store::{DocumentStore, IdentityProvider, StoreEvent, TaskQuery};

use crate::error::{AccountError, Result};

// ============================================================================
// CleanupReport
// ============================================================================

/// Part of the deletion cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupStep {
    /// Identity-provider account.
    Account,
    /// `userSettings/{uid}`.
    Settings,
    /// Querying the user's tasks.
    TaskQuery,
    /// One `tasks/{id}` document.
    Task(TaskId),
}

impl fmt::Display for CleanupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupStep::Account => f.write_str("account"),
            CleanupStep::Settings => f.write_str("settings"),
            CleanupStep::TaskQuery => f.write_str("task query"),
            CleanupStep::Task(id) => write!(f, "task {id}"),
        }
    }
}

/// Outcome of removing a deleted user's data.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupReport {
    /// The deleted user.
    pub uid: UserId,
    /// Identity account removed (or already absent).
    pub account_removed: bool,
    /// Settings document removed.
    pub settings_removed: bool,
    /// Assigned tasks removed.
    pub tasks_removed: usize,
    /// Steps that failed, with their error.
    pub failures: Vec<(CleanupStep, AccountError)>,
}

impl CleanupReport {
    fn new(uid: UserId) -> Self {
        Self {
            uid,
            account_removed: false,
            settings_removed: false,
            tasks_removed: 0,
            failures: Vec::new(),
        }
    }

    /// Whether every step succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// LifecycleHooks
// ============================================================================

/// Handlers for user document creation and deletion.
#[derive(Clone)]
pub struct LifecycleHooks {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl LifecycleHooks {
    /// Create hooks over a store and identity provider.
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// Provision default settings seeded with the new user's role.
    pub async fn on_user_created(&self, uid: &UserId, record: &UserRecord) -> Result<()> {
        let settings = UserSettings::defaults_for(record.role, Utc::now());
        self.store.put_settings(uid, settings).await?;
        tracing::info!(uid = %uid, role = %record.role, "Created settings for user");
        Ok(())
    }

    /// Remove the identity account, settings, and assigned tasks of a
    /// deleted user.
    ///
    /// Each removal is attempted regardless of the others. An identity
    /// account that is already gone counts as removed.
    pub async fn on_user_deleted(&self, uid: &UserId) -> CleanupReport {
        let mut report = CleanupReport::new(uid.clone());
        let assigned = TaskQuery::new().assigned_to(uid.clone());

        let (account, settings, tasks) = tokio::join!(
            self.identity.delete_account(uid),
            self.store.delete_settings(uid),
            self.store.find_tasks(&assigned),
        );

        match account {
            Ok(()) | Err(warden_store::Error::NotFound { .. }) => report.account_removed = true,
            Err(err) => report.failures.push((CleanupStep::Account, err.into())),
        }

        match settings {
            Ok(()) => report.settings_removed = true,
            Err(err) => report.failures.push((CleanupStep::Settings, err.into())),
        }

        match tasks {
            Ok(tasks) => {
                let deletions = tasks.iter().map(|task| async move {
                    (task.id.clone(), self.store.delete_task(&task.id).await)
                });
                for (id, outcome) in join_all(deletions).await {
                    match outcome {
                        Ok(()) => report.tasks_removed += 1,
                        Err(err) => report.failures.push((CleanupStep::Task(id), err.into())),
                    }
                }
            }
            Err(err) => report.failures.push((CleanupStep::TaskQuery, err.into())),
        }

        for (step, err) in &report.failures {
            tracing::error!(uid = %uid, step = %step, error = %err, "User cleanup step failed");
        }
        tracing::info!(
            uid = %uid,
            tasks = report.tasks_removed,
            failures = report.failures.len(),
            "Cleaned up data for deleted user"
        );
        report
    }

    /// Dispatch one store event.
    pub async fn handle(&self, event: StoreEvent) {
        match event {
            StoreEvent::UserCreated { uid, record } => {
                if let Err(err) = self.on_user_created(&uid, &record).await {
                    tracing::error!(uid = %uid, error = %err, "Error creating user settings");
                }
            }
            StoreEvent::UserDeleted { uid, .. } => {
                self.on_user_deleted(&uid).await;
            }
        }
    }
}

impl fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks").finish_non_exhaustive()
    }
}

// ============================================================================
// TriggerRunner
// ============================================================================

/// Consumes store events and dispatches them to [`LifecycleHooks`].
#[derive(Debug)]
pub struct TriggerRunner {
    hooks: LifecycleHooks,
    events: broadcast::Receiver<StoreEvent>,
}

impl TriggerRunner {
    /// Subscribe to `store` and dispatch its events to `hooks`.
    pub fn new(hooks: LifecycleHooks, store: &dyn DocumentStore) -> Self {
        Self {
            hooks,
            events: store.subscribe(),
        }
    }

    /// Process events until the store's channel closes.
    ///
    /// Events are handled one at a time in the order they were emitted. If
    /// the runner falls behind and events are dropped, the loss is logged
    /// and processing continues with the oldest retained event.
    pub async fn run(mut self) {
        loop {
            match self.events.recv().await {
                Ok(event) => {
                    tracing::debug!(uid = %event.uid(), "Dispatching store event");
                    self.hooks.handle(event).await;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Trigger runner lagged; events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("Store event channel closed");
                    break;
                }
            }
        }
    }

    /// Run on the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
