//! Wiring collaborators together for `serve` and `run-job`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use warden_accounts::{AccountService, LifecycleHooks, TriggerRunner};
use warden_api::AppState;
use warden_auth_firebase::FirebaseTokenValidator;
use warden_authz::Authorizer;
use warden_jobs::{JobName, JobRunner, Schedule};
use warden_store::{DocumentStore, MemoryIdentity, MemoryStore};

use crate::config::WardenConfig;
use crate::error::{Error, Result};

/// Every long-lived service, built from one config.
#[derive(Debug)]
pub struct Runtime {
    /// Document store.
    pub store: Arc<MemoryStore>,
    /// Identity provider.
    pub identity: Arc<MemoryIdentity>,
    /// Permission decisions.
    pub authorizer: Arc<Authorizer>,
    /// Account operations.
    pub accounts: Arc<AccountService>,
    /// Scheduled jobs.
    pub jobs: Arc<JobRunner>,
}

impl Runtime {
    /// Build services over fresh in-memory collaborators.
    ///
    /// Fails on an invalid permission table or time zone.
    pub fn build(config: &WardenConfig) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentity::new());
        let authorizer = Arc::new(config.authorizer()?);
        let accounts = AccountService::new(
            store.clone(),
            identity.clone(),
            authorizer.clone(),
            config.bootstrap.clone(),
        );
        let jobs = JobRunner::new(store.clone(), config.jobs.clone())?;

        if config.bootstrap.super_admin_email.is_none() {
            tracing::warn!("No super-admin email configured; createSuperAdmin will refuse");
        }

        Ok(Self {
            store,
            identity,
            authorizer,
            accounts: Arc::new(accounts),
            jobs: Arc::new(jobs),
        })
    }

    /// Handler state for the HTTP router.
    pub fn state(&self) -> AppState {
        AppState {
            accounts: self.accounts.clone(),
            jobs: self.jobs.clone(),
            store: self.store.clone(),
            authorizer: self.authorizer.clone(),
        }
    }

    /// Runner dispatching store events to the lifecycle hooks.
    pub fn trigger_runner(&self) -> TriggerRunner {
        let hooks = LifecycleHooks::new(self.store.clone(), self.identity.clone());
        TriggerRunner::new(hooks, self.store.as_ref() as &dyn DocumentStore)
    }
}

/// Serve HTTP until Ctrl-C, with the trigger runner alongside.
pub async fn serve(config: &WardenConfig) -> Result<()> {
    let runtime = Runtime::build(config)?;
    let triggers = runtime.trigger_runner().spawn();

    let validator = Arc::new(FirebaseTokenValidator::new(config.auth.jwks_url.clone()));
    let app = warden_api::app(runtime.state(), validator, config.auth.to_auth_config());
    let served = warden_api::serve(app, &config.server.bind).await;

    triggers.abort();
    served.map_err(Error::Server)
}

/// Base URL of a server listening on `bind`. Wildcard hosts are reached
/// over loopback.
pub fn server_url(bind: &str) -> String {
    let addr = match bind.rsplit_once(':') {
        Some(("0.0.0.0", port)) => format!("127.0.0.1:{port}"),
        Some(("[::]", port)) => format!("[::1]:{port}"),
        _ => bind.to_string(),
    };
    format!("http://{addr}")
}

/// Ask the running server at `base_url` to run `name` now.
///
/// Jobs operate on the server's store, so this goes through
/// `POST /jobs/{name}` with `token` as the bearer credential. The returned
/// value is the server's job report.
pub async fn trigger_job(
    base_url: &str,
    name: &str,
    token: Option<&str>,
) -> Result<serde_json::Value> {
    let job: JobName = name.parse()?;
    let url = format!("{}/jobs/{job}", base_url.trim_end_matches('/'));
    tracing::debug!(url = %url, "Triggering job");

    let mut request = reqwest::Client::new().post(&url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    let response = request.send().await?;
    let status = response.status();
    let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);

    if !status.is_success() {
        let message = body["error"]["message"]
            .as_str()
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"))
            .to_string();
        return Err(Error::Remote {
            status: status.as_u16(),
            message,
        });
    }
    Ok(body)
}

/// One row of `warden jobs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListing {
    /// Job.
    pub job: JobName,
    /// When it fires.
    pub schedule: Schedule,
    /// Next firing after the reference time, if any.
    pub next: Option<DateTime<Utc>>,
}

/// Every job with its next firing after `now` in the configured zone.
pub fn job_listings(config: &WardenConfig, now: DateTime<Utc>) -> Result<Vec<JobListing>> {
    let tz = config.jobs.tz()?;
    Ok(JobName::ALL
        .into_iter()
        .map(|job| {
            let schedule = job.schedule();
            JobListing {
                job,
                schedule,
                next: schedule.next_after(now, tz),
            }
        })
        .collect())
}
