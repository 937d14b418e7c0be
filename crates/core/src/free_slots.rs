//! Free slot finder - complement of the busy timeline within a window
//!
//! The window is the universe. Busy blocks are clipped to it and walked in
//! order with a cursor; every gap the cursor skips over is a free interval.

use chrono::{Datelike, Duration};
use chrono_tz::Tz;
use cadence_domain::{Interval, Timeline, WorkingHours};
use tracing::debug;

use crate::timeline::merge_intervals;
use crate::zone::{local_date, local_day, local_span};

/// Computes maximal free intervals.
#[derive(Debug, Clone, Default)]
pub struct FreeSlotFinder {
    working_hours: Option<WorkingHours>,
}

impl FreeSlotFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat time outside `hours` as busy.
    pub fn with_working_hours(mut self, hours: Option<WorkingHours>) -> Self {
        self.working_hours = hours;
        self
    }

    pub fn working_hours(&self) -> Option<&WorkingHours> {
        self.working_hours.as_ref()
    }

    /// Free intervals of at least `min_duration` inside `window`, in
    /// chronological order and expressed in the timeline's zone. An empty
    /// result is a normal outcome.
    pub fn find_free(
        &self,
        timeline: &Timeline,
        window: &Interval,
        min_duration: Duration,
    ) -> Vec<Interval> {
        let window = window.in_zone(&timeline.zone);
        let mut blocked: Vec<Interval> = timeline
            .busy_intervals()
            .filter_map(|busy| busy.clip_to(&window))
            .map(|busy| busy.in_zone(&timeline.zone))
            .collect();

        if let Some(hours) = &self.working_hours {
            blocked.extend(off_hours(&timeline.zone, &window, hours));
            blocked = merge_intervals(blocked);
        }

        let mut free = Vec::new();
        let mut cursor = window.start();
        for busy in &blocked {
            if busy.start() > cursor {
                push_gap(&mut free, cursor, busy.start(), min_duration);
            }
            cursor = cursor.max(busy.end());
        }
        push_gap(&mut free, cursor, window.end(), min_duration);

        debug!(
            blocked = blocked.len(),
            free = free.len(),
            min_minutes = min_duration.num_minutes(),
            "Free slots computed"
        );
        free
    }
}

/// [`FreeSlotFinder::find_free`] without a working-hours mask.
pub fn find_free(timeline: &Timeline, window: &Interval, min_duration: Duration) -> Vec<Interval> {
    FreeSlotFinder::new().find_free(timeline, window, min_duration)
}

fn push_gap(
    free: &mut Vec<Interval>,
    from: chrono::DateTime<chrono::FixedOffset>,
    to: chrono::DateTime<chrono::FixedOffset>,
    min_duration: Duration,
) {
    // Zero-length gaps fail construction and are never free.
    if let Ok(gap) = Interval::new(from, to) {
        if gap.duration() >= min_duration {
            free.push(gap);
        }
    }
}

/// Spans inside `window` that fall outside working hours, computed per local
/// day so DST days keep their true length.
pub fn off_hours(zone: &Tz, window: &Interval, hours: &WorkingHours) -> Vec<Interval> {
    let first = local_date(zone, &window.start());
    let last = local_date(zone, &window.end());

    let mut spans = Vec::new();
    for date in first.iter_days().take_while(|date| *date <= last) {
        let Some(day) = local_day(zone, date) else { continue };

        if !hours.is_working_day(date.weekday()) {
            spans.push(day);
            continue;
        }
        match local_span(zone, date, hours.start_hour, hours.end_hour) {
            Some(work) => {
                spans.extend(Interval::new(day.start(), work.start()).ok());
                spans.extend(Interval::new(work.end(), day.end()).ok());
            }
            None => spans.push(day),
        }
    }

    spans.into_iter().filter_map(|span| span.clip_to(window)).collect()
}
