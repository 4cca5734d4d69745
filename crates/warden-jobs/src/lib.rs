//! # warden-jobs
//!
//! Batch jobs over the document store, fired by an external scheduler:
//!
//! | job | schedule | effect |
//! |---|---|---|
//! | `reminders` | every day 09:00 | reminders for pending tasks due within the lead |
//! | `overdue-sweep` | every day 00:00 | pending tasks past due become `overdue` |
//! | `daily-metrics` | every day 23:59 | per-user metrics since local midnight |
//! | `weekly-metrics` | every monday 00:00 | per-user metrics over the last seven days |
//!
//! Times are wall-clock in the configured zone (`America/New_York` by default).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod schedule;

pub use config::JobsConfig;
pub use error::{Error, Result};
pub use report::{JobReport, Reminder, UnitFailure};
pub use runner::{JobRunner, local_midnight};
pub use schedule::{Cadence, JobName, Schedule};
