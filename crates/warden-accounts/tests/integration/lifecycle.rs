//! Integration tests for user lifecycle hooks and the trigger runner.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use warden_accounts::{CleanupStep, TriggerRunner};
use warden_core::{Role, Task, TaskId, TaskStatus, Theme, UserId};
use warden_store::{IdentityProvider, SettingsStore, TaskQuery, TaskStore, UserStore};

use crate::common::TestHarness;

fn task(id: &str, assignee: &UserId) -> Task {
    Task {
        id: TaskId::new(id),
        title: format!("task {id}"),
        due_date: Utc::now() + ChronoDuration::days(1),
        status: TaskStatus::Pending,
        assigned_to: assignee.clone(),
        completed_at: None,
    }
}

#[tokio::test]
async fn test_on_user_created_provisions_settings() {
    let h = TestHarness::new();
    let uid = h.bare_user("u1", Role::Engineer).await;
    let record = h.store.get_user(&uid).await.unwrap().unwrap();

    h.hooks.on_user_created(&uid, &record).await.unwrap();

    let settings = h.store.get_settings(&uid).await.unwrap().unwrap();
    assert!(settings.email_notifications);
    assert_eq!(settings.theme, Theme::Light);
    assert_eq!(settings.role, Role::Engineer);
}

#[tokio::test]
async fn test_on_user_deleted_cascades() {
    let h = TestHarness::new();
    let uid = h.user_with_role("gone@example.com", Role::Client).await;
    let other = h.user_with_role("stays@example.com", Role::Client).await;
    let record = h.store.get_user(&uid).await.unwrap().unwrap();
    h.hooks.on_user_created(&uid, &record).await.unwrap();
    h.store.put_task(task("t1", &uid)).await.unwrap();
    h.store.put_task(task("t2", &uid)).await.unwrap();
    h.store.put_task(task("t3", &other)).await.unwrap();

    let report = h.hooks.on_user_deleted(&uid).await;

    assert!(report.is_complete(), "{:?}", report.failures);
    assert!(report.account_removed);
    assert!(report.settings_removed);
    assert_eq!(report.tasks_removed, 2);
    assert!(h.identity.get_account(&uid).await.unwrap().is_none());
    assert!(h.store.get_settings(&uid).await.unwrap().is_none());
    let remaining = h.store.find_tasks(&TaskQuery::new()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].assigned_to, other);
}

#[tokio::test]
async fn test_on_user_deleted_without_identity_account() {
    let h = TestHarness::new();
    let uid = h.bare_user("orphan", Role::Client).await;

    let report = h.hooks.on_user_deleted(&uid).await;
    assert!(report.is_complete());
    assert!(report.account_removed);
}

#[tokio::test]
async fn test_on_user_deleted_isolates_failures() {
    let h = TestHarness::new();
    let uid = h.user_with_role("gone@example.com", Role::Client).await;
    h.store.put_task(task("t1", &uid)).await.unwrap();
    h.store.put_task(task("t2", &uid)).await.unwrap();
    h.identity.fail_writes_for(uid.as_str()).await;
    h.store.fail_writes_for("t1").await;

    let report = h.hooks.on_user_deleted(&uid).await;

    assert!(!report.is_complete());
    assert!(!report.account_removed);
    assert!(report.settings_removed);
    assert_eq!(report.tasks_removed, 1);
    let steps: Vec<_> = report.failures.iter().map(|(step, _)| step.clone()).collect();
    assert!(steps.contains(&CleanupStep::Account));
    assert!(steps.contains(&CleanupStep::Task(TaskId::new("t1"))));
    assert!(h.store.get_task(&TaskId::new("t2")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_trigger_runner_dispatches_events() {
    let h = TestHarness::new();
    let runner = TriggerRunner::new(h.hooks.clone(), h.store.as_ref());
    let handle = runner.spawn();

    let uid = h.user_with_role("new@example.com", Role::Client).await;
    let store = h.store.as_ref();
    let id = &uid;
    wait_until(|| async move { store.get_settings(id).await.unwrap().is_some() }).await;

    store.put_task(task("t1", &uid)).await.unwrap();
    store.delete_user(&uid).await.unwrap();
    wait_until(|| async move {
        store.get_settings(id).await.unwrap().is_none()
            && store.get_task(&TaskId::new("t1")).await.unwrap().is_none()
    })
    .await;
    assert!(h.identity.get_account(&uid).await.unwrap().is_none());

    handle.abort();
}

async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        while !check().await {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition should hold before the timeout");
}
