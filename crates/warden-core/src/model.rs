//! Stored documents.
//!
//! Field names serialize in camelCase to stay compatible with the existing
//! document layout (`createdAt`, `assignedTo`, `completionRate`, ...).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_authz::Role;

use crate::error::Error;
use crate::ids::{TaskId, UserId};

// ============================================================================
// Users
// ============================================================================

/// A `users/{uid}` document. Source of truth for a user's role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Account email.
    pub email: String,
    /// Assigned privilege level.
    pub role: Role,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Who created the account, when created by another user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
}

impl UserRecord {
    /// A fresh record stamped with `now`.
    pub fn new(email: impl Into<String>, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            role,
            created_at: now,
            updated_at: now,
            created_by: None,
        }
    }

    /// Set the creating user.
    pub fn with_created_by(mut self, creator: Option<UserId>) -> Self {
        self.created_by = creator;
        self
    }
}

/// UI theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme.
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

/// A `userSettings/{uid}` document, provisioned when a user is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Whether the user receives email notifications.
    pub email_notifications: bool,
    /// UI theme.
    pub theme: Theme,
    /// Provisioning time.
    pub created_at: DateTime<Utc>,
    /// Role the user held when settings were provisioned.
    pub role: Role,
}

impl UserSettings {
    /// Default settings for a user holding `role`.
    pub fn defaults_for(role: Role, now: DateTime<Utc>) -> Self {
        Self {
            email_notifications: true,
            theme: Theme::Light,
            created_at: now,
            role,
        }
    }
}

// ============================================================================
// Tasks
// ============================================================================

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not yet done.
    Pending,
    /// Done.
    Completed,
    /// Still pending after its due date.
    Overdue,
}

impl TaskStatus {
    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            "overdue" => Ok(TaskStatus::Overdue),
            other => Err(Error::validation_field(
                "status",
                format!("unknown task status '{other}'"),
            )),
        }
    }
}

/// A `tasks/{id}` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Document ID.
    pub id: TaskId,
    /// Short description.
    pub title: String,
    /// When the task is due.
    pub due_date: DateTime<Utc>,
    /// Current status.
    pub status: TaskStatus,
    /// Assignee.
    pub assigned_to: UserId,
    /// When the task was completed, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Whether the task is completed no later than its due date.
    pub fn completed_on_time(&self) -> bool {
        self.status == TaskStatus::Completed
            && self.completed_at.is_some_and(|done| done <= self.due_date)
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Aggregation window of a metric record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricPeriod {
    /// Since local midnight.
    Daily,
    /// Trailing seven days.
    Weekly,
}

impl MetricPeriod {
    /// Collection the records for this period are written to.
    pub const fn collection(self) -> &'static str {
        match self {
            MetricPeriod::Daily => "dailyMetrics",
            MetricPeriod::Weekly => "performance",
        }
    }
}

impl fmt::Display for MetricPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricPeriod::Daily => f.write_str("daily"),
            MetricPeriod::Weekly => f.write_str("weekly"),
        }
    }
}

/// Completion counts over a set of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionStats {
    /// Tasks considered.
    pub total: u32,
    /// Tasks completed no later than their due date.
    pub completed_on_time: u32,
}

impl CompletionStats {
    /// Count tasks.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            if task.completed_on_time() {
                stats.completed_on_time += 1;
            }
            stats
        })
    }

    /// `completed_on_time / total`, or `0.0` when there are no tasks.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.completed_on_time) / f64::from(self.total)
        }
    }
}

/// A per-user metric document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    /// User the metrics describe.
    pub user_id: UserId,
    /// Aggregation window.
    pub period: MetricPeriod,
    /// Start of the window.
    pub period_start: DateTime<Utc>,
    /// Tasks completed in the window.
    pub total_tasks: u32,
    /// Of those, completed no later than their due date.
    pub completed_on_time: u32,
    /// `completed_on_time / total_tasks`, `0.0` if no tasks.
    pub completion_rate: f64,
    /// When the record was computed.
    pub timestamp: DateTime<Utc>,
}

impl MetricRecord {
    /// Build a record from completion stats.
    pub fn new(
        user_id: UserId,
        period: MetricPeriod,
        period_start: DateTime<Utc>,
        stats: CompletionStats,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            period,
            period_start,
            total_tasks: stats.total,
            completed_on_time: stats.completed_on_time,
            completion_rate: stats.completion_rate(),
            timestamp,
        }
    }
}
