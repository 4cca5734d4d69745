//! Job names and schedule descriptors.
//!
//! Warden does not run a timer of its own. An external scheduler fires each
//! job at its [`Schedule`], either through `warden run-job` or the
//! `POST /jobs/{name}` endpoint.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use warden_authz::Action;

use crate::error::Error;

/// A scheduled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobName {
    /// Reminder scan over pending tasks due soon.
    Reminders,
    /// Mark pending tasks past their due date as overdue.
    OverdueSweep,
    /// Per-user completion metrics since local midnight.
    DailyMetrics,
    /// Per-user completion metrics over the trailing week.
    WeeklyMetrics,
}

impl JobName {
    /// Every job.
    pub const ALL: [JobName; 4] = [
        JobName::Reminders,
        JobName::OverdueSweep,
        JobName::DailyMetrics,
        JobName::WeeklyMetrics,
    ];

    /// Name used on the command line and in URLs.
    pub const fn as_str(self) -> &'static str {
        match self {
            JobName::Reminders => "reminders",
            JobName::OverdueSweep => "overdue-sweep",
            JobName::DailyMetrics => "daily-metrics",
            JobName::WeeklyMetrics => "weekly-metrics",
        }
    }

    /// When the job fires.
    pub const fn schedule(self) -> Schedule {
        match self {
            JobName::Reminders => Schedule::daily(9, 0),
            JobName::OverdueSweep => Schedule::daily(0, 0),
            JobName::DailyMetrics => Schedule::daily(23, 59),
            JobName::WeeklyMetrics => Schedule::weekly(Weekday::Mon, 0, 0),
        }
    }

    /// Action a caller must be allowed to perform to trigger the job by hand.
    pub const fn required_action(self) -> Action {
        match self {
            JobName::Reminders | JobName::OverdueSweep => Action::ManageTasks,
            JobName::DailyMetrics | JobName::WeeklyMetrics => Action::ViewAnalytics,
        }
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobName::ALL
            .into_iter()
            .find(|job| job.as_str() == s)
            .ok_or_else(|| Error::UnknownJob(s.to_string()))
    }
}

// ============================================================================
// Schedule
// ============================================================================

/// How often a schedule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Every day.
    Daily,
    /// Once a week on the given day.
    Weekly(Weekday),
}

/// Wall-clock firing time in the configured zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Repetition.
    pub cadence: Cadence,
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Minute of hour, 0-59.
    pub minute: u32,
}

impl Schedule {
    /// Every day at `hour:minute`.
    pub const fn daily(hour: u32, minute: u32) -> Self {
        Self {
            cadence: Cadence::Daily,
            hour,
            minute,
        }
    }

    /// Every `day` at `hour:minute`.
    pub const fn weekly(day: Weekday, hour: u32, minute: u32) -> Self {
        Self {
            cadence: Cadence::Weekly(day),
            hour,
            minute,
        }
    }

    /// First firing strictly after `after`, evaluated in `tz`.
    ///
    /// Local times skipped by a daylight-saving transition are not fired on
    /// that day; ambiguous local times fire at their first occurrence.
    pub fn next_after(&self, after: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
        let at = NaiveTime::from_hms_opt(self.hour, self.minute, 0)?;
        let today = after.with_timezone(&tz).date_naive();

        (0..=8u64)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .filter(|date| match self.cadence {
                Cadence::Daily => true,
                Cadence::Weekly(day) => date.weekday() == day,
            })
            .filter_map(|date| tz.from_local_datetime(&date.and_time(at)).earliest())
            .map(|local| local.with_timezone(&Utc))
            .find(|candidate| *candidate > after)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cadence {
            Cadence::Daily => f.write_str("every day")?,
            Cadence::Weekly(day) => write!(f, "every {}", weekday_name(day))?,
        }
        write!(f, " {:02}:{:02}", self.hour, self.minute)
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
