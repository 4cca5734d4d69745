//! Job outcome reporting.

use serde::Serialize;
use warden_core::{TaskId, UserId};

use crate::schedule::JobName;

/// One unit of work that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    /// Task or user ID the unit worked on.
    pub unit: String,
    /// What went wrong.
    pub message: String,
}

/// Outcome of one job run.
///
/// A job is a batch of independent units (one per task or per user). A
/// failed unit is recorded here and never stops the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Which job ran.
    #[serde(serialize_with = "serialize_job")]
    pub job: JobName,
    /// Units that completed.
    pub succeeded: usize,
    /// Units passed over on purpose.
    pub skipped: Vec<UnitFailure>,
    /// Units that failed.
    pub failed: Vec<UnitFailure>,
}

impl JobReport {
    /// An empty report for `job`.
    pub fn new(job: JobName) -> Self {
        Self {
            job,
            succeeded: 0,
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Record a completed unit.
    pub fn success(&mut self) {
        self.succeeded += 1;
    }

    /// Record a skipped unit.
    pub fn skip(&mut self, unit: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(UnitFailure {
            unit: unit.into(),
            message: reason.into(),
        });
    }

    /// Record a failed unit.
    pub fn failure(&mut self, unit: impl Into<String>, message: impl ToString) {
        self.failed.push(UnitFailure {
            unit: unit.into(),
            message: message.to_string(),
        });
    }

    /// Whether every unit completed or was skipped on purpose.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Units the job considered.
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped.len() + self.failed.len()
    }

    pub(crate) fn log_summary(&self) {
        for failure in &self.failed {
            tracing::error!(job = %self.job, unit = %failure.unit, error = %failure.message, "Job unit failed");
        }
        tracing::info!(
            job = %self.job,
            succeeded = self.succeeded,
            skipped = self.skipped.len(),
            failed = self.failed.len(),
            "Job finished"
        );
    }
}

fn serialize_job<S: serde::Serializer>(job: &JobName, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(job.as_str())
}

/// A reminder due for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Task that is due.
    pub task_id: TaskId,
    /// Assignee.
    pub user_id: UserId,
    /// Where to send the reminder.
    pub email: String,
}
