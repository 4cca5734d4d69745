//! `[jobs]` configuration.

use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Zone every schedule fires in unless configured otherwise.
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";

/// Default look-ahead of the reminder scan.
pub const DEFAULT_REMINDER_LEAD_HOURS: i64 = 24;

/// Settings shared by every job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// IANA zone name schedules and the daily window are computed in.
    pub time_zone: String,
    /// Tasks due within this many hours get a reminder.
    pub reminder_lead_hours: i64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            reminder_lead_hours: DEFAULT_REMINDER_LEAD_HOURS,
        }
    }
}

impl JobsConfig {
    /// Parse the configured zone.
    pub fn tz(&self) -> Result<Tz> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| Error::InvalidTimeZone(self.time_zone.clone()))
    }

    /// Reminder look-ahead as a duration.
    pub fn reminder_lead(&self) -> Duration {
        Duration::hours(self.reminder_lead_hours)
    }
}
