//! In-memory collaborators.
//!
//! `MemoryStore` keeps every collection in ordered maps behind a
//! `tokio::sync::RwLock` and publishes user lifecycle events on a broadcast
//! channel. `MemoryIdentity` does the same for sign-in accounts. Both support
//! per-key write failures so callers can exercise partial-failure paths.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, broadcast};
use warden_core::{
    MetricPeriod, MetricRecord, Role, Task, TaskId, TaskStatus, UserId, UserRecord, UserSettings,
};

use crate::error::{Error, Result};
use crate::events::{EVENT_CHANNEL_CAPACITY, StoreEvent};
use crate::query::TaskQuery;
use crate::traits::{
    EventSource, IdentityAccount, IdentityProvider, MetricsStore, NewAccount, SettingsStore,
    TaskStore, UserStore,
};

/// Shortest password the identity provider accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Default)]
struct Collections {
    users: BTreeMap<UserId, UserRecord>,
    settings: BTreeMap<UserId, UserSettings>,
    tasks: BTreeMap<TaskId, Task>,
    metrics: Vec<(String, MetricRecord)>,
}

/// Document store held entirely in memory.
pub struct MemoryStore {
    data: RwLock<Collections>,
    failing: RwLock<HashSet<String>>,
    events: broadcast::Sender<StoreEvent>,
    next_metric: AtomicU64,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            data: RwLock::new(Collections::default()),
            failing: RwLock::new(HashSet::new()),
            events,
            next_metric: AtomicU64::new(1),
        }
    }

    /// Make every write touching `key` (a uid or task ID) fail with a
    /// backend error.
    pub async fn fail_writes_for(&self, key: impl Into<String>) {
        self.failing.write().await.insert(key.into());
    }

    /// Clear all injected failures.
    pub async fn clear_failures(&self) {
        self.failing.write().await.clear();
    }

    async fn check_writable(&self, key: &str) -> Result<()> {
        if self.failing.read().await.contains(key) {
            return Err(Error::backend(format!("write to '{key}' failed")));
        }
        Ok(())
    }

    fn publish(&self, event: StoreEvent) {
        // No subscribers is fine.
        if self.events.send(event).is_err() {
            tracing::trace!("No event subscribers");
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, uid: &UserId) -> Result<Option<UserRecord>> {
        Ok(self.data.read().await.users.get(uid).cloned())
    }

    async fn create_user(&self, uid: &UserId, record: UserRecord) -> Result<()> {
        self.check_writable(uid.as_str()).await?;
        {
            let mut data = self.data.write().await;
            if data.users.contains_key(uid) {
                return Err(Error::already_exists("users", uid.as_str()));
            }
            data.users.insert(uid.clone(), record.clone());
        }
        tracing::debug!(uid = %uid, role = %record.role, "User document created");
        self.publish(StoreEvent::UserCreated {
            uid: uid.clone(),
            record,
        });
        Ok(())
    }

    async fn update_role(&self, uid: &UserId, role: Role, now: DateTime<Utc>) -> Result<()> {
        self.check_writable(uid.as_str()).await?;
        let mut data = self.data.write().await;
        let record = data
            .users
            .get_mut(uid)
            .ok_or_else(|| Error::not_found("users", uid.as_str()))?;
        record.role = role;
        record.updated_at = now;
        Ok(())
    }

    async fn delete_user(&self, uid: &UserId) -> Result<Option<UserRecord>> {
        self.check_writable(uid.as_str()).await?;
        let removed = self.data.write().await.users.remove(uid);
        if let Some(record) = &removed {
            tracing::debug!(uid = %uid, "User document deleted");
            self.publish(StoreEvent::UserDeleted {
                uid: uid.clone(),
                record: record.clone(),
            });
        }
        Ok(removed)
    }

    async fn list_users(&self) -> Result<Vec<(UserId, UserRecord)>> {
        let data = self.data.read().await;
        Ok(data
            .users
            .iter()
            .map(|(uid, record)| (uid.clone(), record.clone()))
            .collect())
    }

    async fn any_with_role(&self, role: Role) -> Result<bool> {
        Ok(self
            .data
            .read()
            .await
            .users
            .values()
            .any(|record| record.role == role))
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_settings(&self, uid: &UserId) -> Result<Option<UserSettings>> {
        Ok(self.data.read().await.settings.get(uid).cloned())
    }

    async fn put_settings(&self, uid: &UserId, settings: UserSettings) -> Result<()> {
        self.check_writable(uid.as_str()).await?;
        self.data.write().await.settings.insert(uid.clone(), settings);
        Ok(())
    }

    async fn delete_settings(&self, uid: &UserId) -> Result<()> {
        self.check_writable(uid.as_str()).await?;
        self.data.write().await.settings.remove(uid);
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn put_task(&self, task: Task) -> Result<()> {
        self.check_writable(task.id.as_str()).await?;
        self.data.write().await.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>> {
        Ok(self.data.read().await.tasks.get(id).cloned())
    }

    async fn find_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let data = self.data.read().await;
        Ok(data
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .cloned()
            .collect())
    }

    async fn set_task_status(&self, id: &TaskId, status: TaskStatus) -> Result<()> {
        self.check_writable(id.as_str()).await?;
        let mut data = self.data.write().await;
        let task = data
            .tasks
            .get_mut(id)
            .ok_or_else(|| Error::not_found("tasks", id.as_str()))?;
        task.status = status;
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        self.check_writable(id.as_str()).await?;
        self.data
            .write()
            .await
            .tasks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("tasks", id.as_str()))
    }
}

#[async_trait]
impl MetricsStore for MemoryStore {
    async fn add_metric(&self, record: MetricRecord) -> Result<String> {
        self.check_writable(record.user_id.as_str()).await?;
        let id = format!(
            "{}-{}",
            record.period.collection(),
            self.next_metric.fetch_add(1, Ordering::Relaxed)
        );
        self.data.write().await.metrics.push((id.clone(), record));
        Ok(id)
    }

    async fn list_metrics(&self, period: MetricPeriod) -> Result<Vec<MetricRecord>> {
        let data = self.data.read().await;
        Ok(data
            .metrics
            .iter()
            .filter(|(_, record)| record.period == period)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

impl EventSource for MemoryStore {
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Identity provider held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryIdentity {
    accounts: RwLock<BTreeMap<UserId, IdentityAccount>>,
    failing: RwLock<HashSet<String>>,
}

impl MemoryIdentity {
    /// An identity provider with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write touching `uid` fail with a backend error.
    pub async fn fail_writes_for(&self, uid: impl Into<String>) {
        self.failing.write().await.insert(uid.into());
    }

    /// Number of accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether there are no accounts.
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    async fn check_writable(&self, uid: &UserId) -> Result<()> {
        if self.failing.read().await.contains(uid.as_str()) {
            return Err(Error::backend(format!("identity write for '{uid}' failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn create_account(&self, account: NewAccount) -> Result<IdentityAccount> {
        if !account.email.contains('@') {
            return Err(Error::Rejected(format!(
                "'{}' is not a valid email address",
                account.email
            )));
        }
        if account.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Rejected(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let mut accounts = self.accounts.write().await;
        if accounts
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(Error::already_exists("accounts", account.email));
        }

        let created = IdentityAccount {
            uid: UserId::generate(),
            email: account.email,
            email_verified: account.email_verified,
            role_claim: None,
        };
        accounts.insert(created.uid.clone(), created.clone());
        tracing::debug!(uid = %created.uid, "Identity account created");
        Ok(created)
    }

    async fn get_account(&self, uid: &UserId) -> Result<Option<IdentityAccount>> {
        Ok(self.accounts.read().await.get(uid).cloned())
    }

    async fn set_role_claim(&self, uid: &UserId, role: Role) -> Result<()> {
        self.check_writable(uid).await?;
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(uid)
            .ok_or_else(|| Error::not_found("accounts", uid.as_str()))?;
        account.role_claim = Some(role);
        Ok(())
    }

    async fn delete_account(&self, uid: &UserId) -> Result<()> {
        self.check_writable(uid).await?;
        self.accounts
            .write()
            .await
            .remove(uid)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("accounts", uid.as_str()))
    }
}

// ============================================================================
// Tests
// ============================================================================
