//! The wired runtime: accounts, triggers, jobs and the HTTP router.

use axum::body::Body;
use chrono::{Duration, Utc};
use http::{Request, StatusCode};
use tower::ServiceExt;
use warden_accounts::CreateAccountRequest;
use warden_cli::{Error, runtime};
use warden_core::{Role, Task, TaskId, TaskStatus};
use warden_jobs::JobName;
use warden_store::{SettingsStore, TaskStore, UserStore};

use crate::common::{ROOT_EMAIL, TestHarness, wait_until};

fn request(email: &str) -> CreateAccountRequest {
    CreateAccountRequest {
        email: email.to_string(),
        password: "hunter22".to_string(),
    }
}

#[tokio::test]
async fn test_trigger_runner_provisions_and_cleans_up() {
    let h = TestHarness::new();
    let handle = h.runtime.trigger_runner().spawn();

    let root = h
        .runtime
        .accounts
        .create_super_admin(request(ROOT_EMAIL))
        .await
        .unwrap();
    let created = h
        .runtime
        .accounts
        .create_user_account(Some(&root.uid), request("client@example.com"))
        .await
        .unwrap();

    let store = h.runtime.store.as_ref();
    let uid = &created.uid;
    wait_until(|| async move { store.get_settings(uid).await.unwrap().is_some() }).await;
    let settings = store.get_settings(uid).await.unwrap().unwrap();
    assert_eq!(settings.role, Role::Client);

    store.delete_user(uid).await.unwrap();
    wait_until(|| async move { store.get_settings(uid).await.unwrap().is_none() }).await;

    handle.abort();
}

#[tokio::test]
async fn test_runtime_jobs_share_the_store() {
    let h = TestHarness::new();
    let root = h
        .runtime
        .accounts
        .create_super_admin(request(ROOT_EMAIL))
        .await
        .unwrap();
    h.runtime
        .store
        .put_task(Task {
            id: TaskId::new("late"),
            title: "late".to_string(),
            due_date: Utc::now() - Duration::hours(1),
            status: TaskStatus::Pending,
            assigned_to: root.uid.clone(),
            completed_at: None,
        })
        .await
        .unwrap();

    let report = h
        .runtime
        .jobs
        .run(JobName::OverdueSweep, Utc::now())
        .await
        .unwrap();

    assert_eq!(report.succeeded, 1);
    let task = h
        .runtime
        .store
        .get_task(&TaskId::new("late"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.status, TaskStatus::Overdue);
}

#[tokio::test]
async fn test_run_job_goes_through_the_server() {
    let h = TestHarness::new();
    let root = h
        .runtime
        .accounts
        .create_super_admin(request(ROOT_EMAIL))
        .await
        .unwrap();
    h.runtime
        .store
        .put_task(Task {
            id: TaskId::new("late"),
            title: "late".to_string(),
            due_date: Utc::now() - Duration::hours(1),
            status: TaskStatus::Pending,
            assigned_to: root.uid.clone(),
            completed_at: None,
        })
        .await
        .unwrap();
    let base = h.spawn_server().await;

    let token = format!("uid:{}", root.uid);
    let report = runtime::trigger_job(&base, "overdue-sweep", Some(&token))
        .await
        .unwrap();

    assert_eq!(report["job"], "overdue-sweep");
    assert_eq!(report["succeeded"], 1);
    let task = h
        .runtime
        .store
        .get_task(&TaskId::new("late"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.status, TaskStatus::Overdue);
}

#[tokio::test]
async fn test_run_job_reports_server_rejection() {
    let h = TestHarness::new();
    let base = h.spawn_server().await;

    let err = runtime::trigger_job(&base, "daily-metrics", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Remote { status: 401, .. }));
}

#[tokio::test]
async fn test_router_over_runtime_state() {
    let h = TestHarness::new();
    let app = warden_api::router(h.runtime.state());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
