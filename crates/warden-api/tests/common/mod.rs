//! Common test harness for warden-api integration tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::Utc;
use http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use warden_accounts::{AccountService, BootstrapConfig};
use warden_api::{AppState, app};
use warden_auth::{AuthConfig, AuthError, AuthenticatedUser, TokenValidator};
use warden_authz::Authorizer;
use warden_core::{Role, UserId, UserRecord};
use warden_jobs::{JobRunner, JobsConfig};
use warden_store::{MemoryIdentity, MemoryStore, UserStore};

/// Designated super-admin email.
pub const ROOT_EMAIL: &str = "root@example.com";

/// Accepts `uid:<uid>` tokens; rejects everything else.
pub struct UidTokenValidator;

impl TokenValidator for UidTokenValidator {
    fn validate(
        &self,
        token: &str,
        _config: &AuthConfig,
    ) -> Pin<Box<dyn Future<Output = Result<AuthenticatedUser, AuthError>> + Send + '_>> {
        let token = token.to_string();
        Box::pin(async move {
            token
                .strip_prefix("uid:")
                .map(AuthenticatedUser::new)
                .ok_or_else(|| AuthError::InvalidSignature("unknown token".to_string()))
        })
    }
}

/// The full router over in-memory collaborators.
pub struct TestHarness {
    /// Document store
    pub store: Arc<MemoryStore>,
    /// Identity provider
    pub identity: Arc<MemoryIdentity>,
    /// Router under test, auth enabled
    pub app: Router,
}

impl TestHarness {
    /// Creates a harness with auth enabled.
    pub fn new() -> Self {
        Self::with_auth(true)
    }

    /// Creates a harness with auth enabled or disabled.
    pub fn with_auth(enabled: bool) -> Self {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentity::new());
        let authorizer = Arc::new(Authorizer::standard());
        let accounts = AccountService::new(
            store.clone(),
            identity.clone(),
            authorizer.clone(),
            BootstrapConfig::designate(ROOT_EMAIL),
        );
        let jobs = JobRunner::new(store.clone(), JobsConfig::default()).expect("valid zone");
        let state = AppState {
            accounts: Arc::new(accounts),
            jobs: Arc::new(jobs),
            store: store.clone(),
            authorizer,
        };
        let auth = AuthConfig {
            enabled,
            project_id: "warden-test".to_string(),
        };
        Self {
            store,
            identity,
            app: app(state, Arc::new(UidTokenValidator), auth),
        }
    }

    /// Writes a user document directly.
    pub async fn user(&self, uid: &str, role: Role) -> UserId {
        let uid = UserId::new(uid);
        self.store
            .create_user(&uid, UserRecord::new(format!("{uid}@example.com"), role, Utc::now()))
            .await
            .expect("user write should succeed");
        uid
    }

    /// Sends a POST as `caller` (no session when `None`).
    pub async fn post(&self, path: &str, caller: Option<&UserId>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, caller, Some(body)).await
    }

    /// Sends a request and decodes the JSON response.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        caller: Option<&UserId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(uid) = caller {
            builder = builder.header("Authorization", format!("Bearer uid:{uid}"));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
