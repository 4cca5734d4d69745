//! Filters over task documents.

use chrono::{DateTime, Utc};
use warden_core::{Task, TaskStatus, UserId};

/// Conjunction of optional filters over `tasks`.
///
/// A backend translates this into its own query language; the in-memory
/// store evaluates [`TaskQuery::matches`] directly.
///
/// ```
/// use chrono::Utc;
/// use warden_core::TaskStatus;
/// use warden_store::TaskQuery;
///
/// let overdue = TaskQuery::new()
///     .status(TaskStatus::Pending)
///     .due_before(Utc::now());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    /// `status == value`
    pub status: Option<TaskStatus>,
    /// `assignedTo == value`
    pub assigned_to: Option<UserId>,
    /// `dueDate < value`
    pub due_before: Option<DateTime<Utc>>,
    /// `dueDate <= value`
    pub due_at_or_before: Option<DateTime<Utc>>,
    /// `completedAt >= value`; tasks without `completedAt` never match
    pub completed_since: Option<DateTime<Utc>>,
}

impl TaskQuery {
    /// A query matching every task.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on status.
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter on assignee.
    pub fn assigned_to(mut self, uid: UserId) -> Self {
        self.assigned_to = Some(uid);
        self
    }

    /// Due strictly before `at`.
    pub fn due_before(mut self, at: DateTime<Utc>) -> Self {
        self.due_before = Some(at);
        self
    }

    /// Due at or before `at`.
    pub fn due_at_or_before(mut self, at: DateTime<Utc>) -> Self {
        self.due_at_or_before = Some(at);
        self
    }

    /// Completed at or after `at`.
    pub fn completed_since(mut self, at: DateTime<Utc>) -> Self {
        self.completed_since = Some(at);
        self
    }

    /// Whether `task` satisfies every filter.
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|s| task.status == s)
            && self.assigned_to.as_ref().is_none_or(|u| &task.assigned_to == u)
            && self.due_before.is_none_or(|at| task.due_date < at)
            && self.due_at_or_before.is_none_or(|at| task.due_date <= at)
            && self
                .completed_since
                .is_none_or(|at| task.completed_at.is_some_and(|done| done >= at))
    }
}
