//! Scheduler configuration structures
//!
//! Loading (environment, files) lives in the infra crate; this module only
//! defines the shape, the defaults and validation.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTEXT_CAPACITY, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_MAX_PROPOSALS,
    DEFAULT_SEARCH_DAYS, DEFAULT_TIMEZONE, DEFAULT_WORKDAY_END_HOUR, DEFAULT_WORKDAY_START_HOUR,
    WEEK_EDGE_SPLIT_HOUR,
};
use crate::errors::{Result, SchedulingError};

/// Top-level scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// IANA name of the working zone every timeline is expressed in.
    pub timezone: String,
    /// Turns remembered per session.
    pub context_capacity: usize,
    /// Proposals returned per request.
    pub max_proposals: usize,
    /// Span searched when the caller asks for "soon" without a window.
    pub default_search_days: u32,
    pub working_hours: Option<WorkingHours>,
    pub ranking: RankingPolicy,
    /// Budget for fetching events from all calendar sources.
    pub fetch_timeout_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            context_capacity: DEFAULT_CONTEXT_CAPACITY,
            max_proposals: DEFAULT_MAX_PROPOSALS,
            default_search_days: DEFAULT_SEARCH_DAYS,
            working_hours: None,
            ranking: RankingPolicy::default(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl SchedulerConfig {
    /// The configured zone, parsed.
    pub fn zone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| SchedulingError::Config(format!("unknown timezone `{}`", self.timezone)))
    }

    pub fn validate(&self) -> Result<()> {
        self.zone()?;
        if self.context_capacity == 0 {
            return Err(SchedulingError::Config("context_capacity must be at least 1".into()));
        }
        if self.max_proposals == 0 {
            return Err(SchedulingError::Config("max_proposals must be at least 1".into()));
        }
        if self.default_search_days == 0 {
            return Err(SchedulingError::Config("default_search_days must be at least 1".into()));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(SchedulingError::Config("fetch_timeout_ms must be positive".into()));
        }
        if let Some(hours) = &self.working_hours {
            hours.validate()?;
        }
        Ok(())
    }
}

/// Daily working hours. Time outside them is treated as busy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingHours {
    pub start_hour: u8,
    pub end_hour: u8,
    pub exclude_weekends: bool,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_WORKDAY_START_HOUR,
            end_hour: DEFAULT_WORKDAY_END_HOUR,
            exclude_weekends: true,
        }
    }
}

impl WorkingHours {
    pub fn validate(&self) -> Result<()> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(SchedulingError::Config(format!(
                "working hours {}..{} must satisfy start < end <= 24",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }

    pub fn is_working_day(&self, day: Weekday) -> bool {
        !(self.exclude_weekends && matches!(day, Weekday::Sat | Weekday::Sun))
    }
}

/// Knobs for the slot ranker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingPolicy {
    /// Demote Monday mornings and Friday afternoons.
    pub avoid_week_edges: bool,
}

impl RankingPolicy {
    /// Whether a local start time falls on a week edge this policy avoids.
    pub fn is_week_edge(&self, local: &NaiveDateTime) -> bool {
        if !self.avoid_week_edges {
            return false;
        }
        let split = u32::from(WEEK_EDGE_SPLIT_HOUR);
        match local.weekday() {
            Weekday::Mon => local.hour() < split,
            Weekday::Fri => local.hour() >= split,
            _ => false,
        }
    }
}
