//! Day availability summary
//!
//! Condenses one local day of a timeline into busy/free totals and a short
//! label for dashboards.

use std::time::Duration as StdDuration;

use cadence_common::time::format_duration;
use cadence_domain::constants::{
    SUMMARY_AVAILABLE_MINUTES, SUMMARY_FREE_MINUTES, SUMMARY_LEFT_MINUTES,
};
use cadence_domain::{DaySummary, Interval, Timeline, WorkingHours};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::free_slots::find_free;
use crate::zone::{local_day, local_span};

/// Builds [`DaySummary`] values, optionally restricted to working hours.
#[derive(Debug, Clone, Default)]
pub struct DaySummarizer {
    working_hours: Option<WorkingHours>,
}

impl DaySummarizer {
    pub fn new(working_hours: Option<WorkingHours>) -> Self {
        Self { working_hours }
    }

    /// Summary of the whole day (or its working hours).
    pub fn summarize(&self, timeline: &Timeline, date: NaiveDate) -> DaySummary {
        let window = self.day_window(timeline, date);
        build_summary(timeline, date, window, Remaining::WholeDay)
    }

    /// Summary of what is left of the day after `now`.
    pub fn summarize_remaining(
        &self,
        timeline: &Timeline,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> DaySummary {
        let Some(window) = self.day_window(timeline, date) else {
            return build_summary(timeline, date, None, Remaining::WholeDay);
        };
        if now >= window.end() {
            return DaySummary { label: "Day complete".to_string(), ..empty_summary(date, Some(window)) };
        }
        let started = now > window.start();
        let remaining = Interval::new(window.start().max(now.fixed_offset()), window.end())
            .map(|span| span.in_zone(&timeline.zone))
            .ok();
        let mode = if started { Remaining::FromNow } else { Remaining::WholeDay };
        build_summary(timeline, date, remaining, mode)
    }

    fn day_window(&self, timeline: &Timeline, date: NaiveDate) -> Option<Interval> {
        match &self.working_hours {
            Some(hours) if !hours.is_working_day(date.weekday()) => None,
            Some(hours) => local_span(&timeline.zone, date, hours.start_hour, hours.end_hour),
            None => local_day(&timeline.zone, date),
        }
    }
}

/// [`DaySummarizer::summarize`] as a free function.
pub fn summarize_day(
    timeline: &Timeline,
    date: NaiveDate,
    working_hours: Option<&WorkingHours>,
) -> DaySummary {
    DaySummarizer::new(working_hours.cloned()).summarize(timeline, date)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Remaining {
    WholeDay,
    FromNow,
}

fn empty_summary(date: NaiveDate, window: Option<Interval>) -> DaySummary {
    DaySummary {
        date,
        window,
        busy_minutes: 0,
        free_minutes: 0,
        largest_free_block: None,
        meeting_count: 0,
        label: String::new(),
    }
}

fn build_summary(
    timeline: &Timeline,
    date: NaiveDate,
    window: Option<Interval>,
    mode: Remaining,
) -> DaySummary {
    let Some(window) = window else {
        return DaySummary { label: "Day off".to_string(), ..empty_summary(date, None) };
    };

    let busy: Duration =
        timeline.busy_intervals().filter_map(|busy| busy.clip_to(&window)).map(|b| b.duration()).sum();
    let free = find_free(timeline, &window, Duration::zero());
    let free_total: Duration = free.iter().map(Interval::duration).sum();
    let largest_free_block = free.iter().fold(None::<Interval>, |best, slot| match best {
        Some(current) if current.duration() >= slot.duration() => Some(current),
        _ => Some(*slot),
    });
    let meeting_count = timeline.events_within(&window).count();

    let label = label_for(meeting_count, free_total, mode);
    DaySummary {
        date,
        window: Some(window),
        busy_minutes: busy.num_minutes(),
        free_minutes: free_total.num_minutes(),
        largest_free_block,
        meeting_count,
        label,
    }
}

fn label_for(meeting_count: usize, free: Duration, mode: Remaining) -> String {
    let pretty = || format_duration(StdDuration::from_secs(free.num_seconds().max(0).unsigned_abs()));
    if meeting_count == 0 {
        return match mode {
            Remaining::WholeDay => "Full day available".to_string(),
            Remaining::FromNow => format!("{} remaining today", pretty()),
        };
    }

    let minutes = free.num_minutes();
    if minutes > SUMMARY_FREE_MINUTES {
        format!("{} free", pretty())
    } else if minutes > SUMMARY_AVAILABLE_MINUTES {
        format!("{} available", pretty())
    } else if minutes > SUMMARY_LEFT_MINUTES {
        format!("{} left", pretty())
    } else {
        "Busy day".to_string()
    }
}
