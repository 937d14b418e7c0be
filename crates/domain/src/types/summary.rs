//! Per-day availability summary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::interval::Interval;

/// How much of one local day is still open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// The span that was summarized (working hours, or the whole local day).
    pub window: Option<Interval>,
    pub busy_minutes: i64,
    pub free_minutes: i64,
    pub largest_free_block: Option<Interval>,
    pub meeting_count: usize,
    pub label: String,
}
