//! HTTP tests for manual job triggers.

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;
use warden_core::{Role, Task, TaskId, TaskStatus};
use warden_store::TaskStore;

use crate::common::TestHarness;

#[tokio::test]
async fn test_unknown_job_is_404() {
    let h = TestHarness::new();
    let admin = h.user("admin", Role::SuperAdmin).await;
    let (status, _) = h.post("/jobs/nightly", Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_job_requires_session() {
    let h = TestHarness::new();
    let (status, _) = h.post("/jobs/overdue-sweep", None, json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_task_jobs_need_manage_tasks() {
    let h = TestHarness::new();
    let client = h.user("client", Role::Client).await;
    let engineer = h.user("engineer", Role::Engineer).await;
    h.store
        .put_task(Task {
            id: TaskId::new("t1"),
            title: "ship it".to_string(),
            due_date: Utc::now() - Duration::hours(1),
            status: TaskStatus::Pending,
            assigned_to: client.clone(),
            completed_at: None,
        })
        .await
        .unwrap();

    let (status, _) = h.post("/jobs/overdue-sweep", Some(&client), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = h.post("/jobs/overdue-sweep", Some(&engineer), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"], "overdue-sweep");
    assert_eq!(body["succeeded"], 1);
    let task = h.store.get_task(&TaskId::new("t1")).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Overdue);
}

#[tokio::test]
async fn test_metrics_jobs_need_view_analytics() {
    let h = TestHarness::new();
    let engineer = h.user("engineer", Role::Engineer).await;
    let founder = h.user("founder", Role::Founder).await;

    let (status, _) = h.post("/jobs/weekly-metrics", Some(&engineer), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = h.post("/jobs/weekly-metrics", Some(&founder), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succeeded"], 2);
}

#[tokio::test]
async fn test_session_without_user_record_is_403() {
    let h = TestHarness::new();
    let ghost = warden_core::UserId::new("ghost");
    let (status, _) = h.post("/jobs/daily-metrics", Some(&ghost), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
