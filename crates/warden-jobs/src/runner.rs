//! The four batch jobs.
//!
//! Each job makes one initial query, then runs one independent unit per task
//! or per user. Units run concurrently; a failing unit is recorded in the
//! [`JobReport`] and the rest carry on. Only a failure of the initial query
//! fails the job as a whole.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use futures::future::join_all;
use warden_core::{CompletionStats, MetricPeriod, MetricRecord, Task, TaskStatus, UserId};
use warden_store::{DocumentStore, TaskQuery};

use crate::config::JobsConfig;
use crate::error::Result;
use crate::report::{JobReport, Reminder};
use crate::schedule::JobName;

/// Runs jobs against a document store.
pub struct JobRunner {
    store: Arc<dyn DocumentStore>,
    config: JobsConfig,
    tz: Tz,
}

impl JobRunner {
    /// Create a runner. Fails if the configured time zone is unknown.
    pub fn new(store: Arc<dyn DocumentStore>, config: JobsConfig) -> Result<Self> {
        let tz = config.tz()?;
        Ok(Self { store, config, tz })
    }

    /// Zone schedules and the daily window are computed in.
    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    /// Run `job` as of `now`.
    pub async fn run(&self, job: JobName, now: DateTime<Utc>) -> Result<JobReport> {
        tracing::info!(job = %job, "Starting job");
        match job {
            JobName::Reminders => self.reminders(now).await.map(|(_, report)| report),
            JobName::OverdueSweep => self.sweep_overdue(now).await,
            JobName::DailyMetrics => self.daily_metrics(now).await,
            JobName::WeeklyMetrics => self.weekly_metrics(now).await,
        }
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    /// Collect reminders for pending tasks due within the reminder lead.
    ///
    /// Tasks whose assignee is missing or has no email are skipped.
    pub async fn reminders(&self, now: DateTime<Utc>) -> Result<(Vec<Reminder>, JobReport)> {
        let horizon = now + self.config.reminder_lead();
        let tasks = self
            .store
            .find_tasks(
                &TaskQuery::new()
                    .status(TaskStatus::Pending)
                    .due_at_or_before(horizon),
            )
            .await?;

        let outcomes = join_all(tasks.iter().map(|task| self.reminder_for(task))).await;

        let mut report = JobReport::new(JobName::Reminders);
        let mut reminders = Vec::new();
        for (task, outcome) in tasks.iter().zip(outcomes) {
            match outcome {
                Ok(Ok(reminder)) => {
                    report.success();
                    reminders.push(reminder);
                }
                Ok(Err(reason)) => {
                    tracing::error!(task_id = %task.id, uid = %task.assigned_to, "{reason}");
                    report.skip(task.id.as_str(), reason);
                }
                Err(err) => report.failure(task.id.as_str(), err),
            }
        }
        tracing::info!(count = reminders.len(), "Processed reminders");
        report.log_summary();
        Ok((reminders, report))
    }

    async fn reminder_for(
        &self,
        task: &Task,
    ) -> warden_store::Result<std::result::Result<Reminder, String>> {
        let Some(user) = self.store.get_user(&task.assigned_to).await? else {
            return Ok(Err(format!("no user record for {}", task.assigned_to)));
        };
        if user.email.trim().is_empty() {
            return Ok(Err(format!("no email found for user {}", task.assigned_to)));
        }
        Ok(Ok(Reminder {
            task_id: task.id.clone(),
            user_id: task.assigned_to.clone(),
            email: user.email,
        }))
    }

    /// Mark pending tasks due strictly before `now` as overdue.
    pub async fn sweep_overdue(&self, now: DateTime<Utc>) -> Result<JobReport> {
        let tasks = self
            .store
            .find_tasks(&TaskQuery::new().status(TaskStatus::Pending).due_before(now))
            .await?;

        let outcomes = join_all(
            tasks
                .iter()
                .map(|task| self.store.set_task_status(&task.id, TaskStatus::Overdue)),
        )
        .await;

        let mut report = JobReport::new(JobName::OverdueSweep);
        for (task, outcome) in tasks.iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.success(),
                Err(err) => report.failure(task.id.as_str(), err),
            }
        }
        tracing::info!(updated = report.succeeded, "Updated overdue tasks");
        report.log_summary();
        Ok(report)
    }

    // ========================================================================
    // Metrics
    // ========================================================================

    /// Record per-user metrics for tasks completed since local midnight.
    pub async fn daily_metrics(&self, now: DateTime<Utc>) -> Result<JobReport> {
        let start = local_midnight(now, self.tz);
        self.metrics(JobName::DailyMetrics, MetricPeriod::Daily, start, now)
            .await
    }

    /// Record per-user metrics for tasks completed in the last seven days.
    pub async fn weekly_metrics(&self, now: DateTime<Utc>) -> Result<JobReport> {
        let start = now - Duration::days(7);
        self.metrics(JobName::WeeklyMetrics, MetricPeriod::Weekly, start, now)
            .await
    }

    async fn metrics(
        &self,
        job: JobName,
        period: MetricPeriod,
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<JobReport> {
        let users = self.store.list_users().await?;
        tracing::debug!(job = %job, users = users.len(), window_start = %start, "Computing metrics");

        let outcomes = join_all(
            users
                .iter()
                .map(|(uid, _)| self.user_metrics(uid, period, start, now)),
        )
        .await;

        let mut report = JobReport::new(job);
        for ((uid, _), outcome) in users.iter().zip(outcomes) {
            match outcome {
                Ok(_) => report.success(),
                Err(err) => report.failure(uid.as_str(), err),
            }
        }
        report.log_summary();
        Ok(report)
    }

    async fn user_metrics(
        &self,
        uid: &UserId,
        period: MetricPeriod,
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> warden_store::Result<String> {
        let tasks = self
            .store
            .find_tasks(
                &TaskQuery::new()
                    .assigned_to(uid.clone())
                    .completed_since(start),
            )
            .await?;
        let stats = CompletionStats::from_tasks(&tasks);
        let record = MetricRecord::new(uid.clone(), period, start, stats, now);
        self.store.add_metric(record).await
    }
}

impl std::fmt::Debug for JobRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRunner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Start of the local day containing `now`, as UTC.
///
/// In zones where midnight can be skipped, the first existing hour of the
/// day is used instead.
pub fn local_midnight(now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let date = now.with_timezone(&tz).date_naive();
    (0..24)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .find_map(|time| tz.from_local_datetime(&date.and_time(time)).earliest())
        .map_or(now, |local| local.with_timezone(&Utc))
}
