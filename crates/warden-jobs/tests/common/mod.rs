//! Common test harness for warden-jobs integration tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use warden_core::{Role, Task, TaskId, TaskStatus, UserId, UserRecord};
use warden_jobs::{JobRunner, JobsConfig};
use warden_store::{MemoryStore, TaskStore, UserStore};

/// A job runner over an in-memory store.
pub struct TestHarness {
    /// Document store
    pub store: Arc<MemoryStore>,
    /// Runner under test
    pub runner: JobRunner,
}

impl TestHarness {
    /// Creates a harness with the default `[jobs]` settings.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let runner =
            JobRunner::new(store.clone(), JobsConfig::default()).expect("default zone is valid");
        Self { store, runner }
    }

    /// Writes a user document.
    pub async fn user(&self, uid: &str, email: &str) -> UserId {
        let uid = UserId::new(uid);
        self.store
            .create_user(&uid, UserRecord::new(email, Role::Engineer, now()))
            .await
            .expect("user write should succeed");
        uid
    }

    /// Writes a task document.
    pub async fn task(&self, task: Task) {
        self.store.put_task(task).await.expect("task write should succeed");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed "now": Wednesday 2025-03-12 16:00 UTC (12:00 EDT).
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 12, 16, 0, 0).unwrap()
}

/// Hours relative to [`now`].
pub fn hours(n: i64) -> DateTime<Utc> {
    now() + Duration::hours(n)
}

/// A pending task.
pub fn pending(id: &str, assignee: &UserId, due: DateTime<Utc>) -> Task {
    Task {
        id: TaskId::new(id),
        title: format!("task {id}"),
        due_date: due,
        status: TaskStatus::Pending,
        assigned_to: assignee.clone(),
        completed_at: None,
    }
}

/// A completed task.
pub fn completed(
    id: &str,
    assignee: &UserId,
    due: DateTime<Utc>,
    done: DateTime<Utc>,
) -> Task {
    Task {
        status: TaskStatus::Completed,
        completed_at: Some(done),
        ..pending(id, assignee, due)
    }
}
