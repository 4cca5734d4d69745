//! Route handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use warden_accounts::{
    AccountService, CreateAccountRequest, CreatedAccount, UpdateRoleRequest, UpdateRoleResponse,
    UserProfile,
};
use warden_authz::Authorizer;
use warden_jobs::{JobName, JobReport, JobRunner};
use warden_store::DocumentStore;

use crate::error::{ApiError, Result};
use crate::session::Session;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Account operations.
    pub accounts: Arc<AccountService>,
    /// Job runner.
    pub jobs: Arc<JobRunner>,
    /// Document store, for caller role lookups.
    pub store: Arc<dyn DocumentStore>,
    /// Permission decisions.
    pub authorizer: Arc<Authorizer>,
}

/// Routes without the auth layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/createSuperAdmin", post(create_super_admin))
        .route("/createUserAccount", post(create_user_account))
        .route("/updateUserRole", post(update_user_role))
        .route("/getUserProfile", post(get_user_profile))
        .route("/jobs/{name}", post(run_job))
        .with_state(state)
}

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::new(rejection.status(), "invalid_input", rejection.body_text()))
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn create_super_admin(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Json<CreatedAccount>> {
    let req = body(payload)?;
    state
        .accounts
        .create_super_admin(req)
        .await
        .map(Json)
        .map_err(|err| ApiError::from_account(err, true))
}

async fn create_user_account(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Json<CreatedAccount>> {
    let req = body(payload)?;
    state
        .accounts
        .create_user_account(session.uid(), req)
        .await
        .map(Json)
        .map_err(|err| ApiError::from_account(err, session.is_present()))
}

async fn update_user_role(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> Result<Json<UpdateRoleResponse>> {
    let req = body(payload)?;
    state
        .accounts
        .update_user_role(session.uid(), req)
        .await
        .map(Json)
        .map_err(|err| ApiError::from_account(err, session.is_present()))
}

async fn get_user_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<UserProfile>> {
    state
        .accounts
        .get_user_profile(session.uid())
        .await
        .map(Json)
        .map_err(|err| ApiError::from_account(err, session.is_present()))
}

/// Trigger a job by hand. The caller's stored role must be allowed the
/// job's required action.
async fn run_job(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
) -> Result<Json<JobReport>> {
    let job: JobName = name
        .parse()
        .map_err(|_| ApiError::not_found(format!("unknown job '{name}'")))?;
    let uid = session.uid().ok_or_else(ApiError::unauthenticated)?;

    let record = state
        .store
        .get_user(uid)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::forbidden("caller has no user record"))?;
    let action = job.required_action();
    if !state.authorizer.can_perform(record.role, action) {
        tracing::warn!(uid = %uid, role = %record.role, job = %job, "Job trigger denied");
        return Err(ApiError::forbidden(format!(
            "role '{}' may not perform '{action}'",
            record.role
        )));
    }

    tracing::info!(uid = %uid, job = %job, "Job triggered by hand");
    state
        .jobs
        .run(job, Utc::now())
        .await
        .map(Json)
        .map_err(ApiError::internal)
}
