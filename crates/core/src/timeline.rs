//! Event timeline - normalizes calendar events into merged busy blocks
//!
//! Events from any number of calendars are converted to absolute intervals
//! in one working zone, deduplicated, sorted and folded into disjoint busy
//! blocks. Merging uses closed-open semantics: an event that starts exactly
//! when the running block ends opens a new block.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use cadence_domain::{
    BusyBlock, Event, Interval, NormalizationError, NormalizationReason, RawEvent, Timeline,
};
use tracing::{debug, instrument};

use crate::zone::{local_midnight, resolve_local};

/// Anything that can be turned into a normalized, source-tagged event.
pub trait BusyItem {
    /// Normalize into `zone`. `Ok(None)` means the item does not occupy time
    /// (for example a cancelled event) and is skipped.
    fn to_event(&self, zone: &Tz) -> Result<Option<Event>, NormalizationError>;
}

impl BusyItem for Event {
    fn to_event(&self, zone: &Tz) -> Result<Option<Event>, NormalizationError> {
        Ok(Some(Event { interval: self.interval.in_zone(zone), ..self.clone() }))
    }
}

impl BusyItem for RawEvent {
    fn to_event(&self, zone: &Tz) -> Result<Option<Event>, NormalizationError> {
        if !self.effective_status().blocks_time() {
            return Ok(None);
        }
        let interval = normalize_raw(self, zone)
            .map_err(|reason| NormalizationError::new(self.id.clone(), reason))?;

        Ok(Some(Event {
            id: self.id.clone(),
            interval,
            source_calendar_id: self.source_calendar_id.clone(),
            title: self.title.clone(),
            attendee_count: self.attendee_count,
        }))
    }
}

/// Builds [`Timeline`]s from heterogeneous event batches.
pub struct EventTimeline;

impl EventTimeline {
    /// Normalize, deduplicate and merge `items` into a timeline in
    /// `target_zone`. Any item that cannot be normalized fails the whole
    /// build.
    #[instrument(skip_all, fields(zone = %target_zone, input = items.len()))]
    pub fn build<T: BusyItem>(
        items: &[T],
        target_zone: Tz,
    ) -> Result<Timeline, NormalizationError> {
        let mut events = Vec::with_capacity(items.len());
        for item in items {
            if let Some(event) = item.to_event(&target_zone)? {
                events.push(event);
            }
        }
        let skipped = items.len() - events.len();

        events.sort_by(|a, b| {
            a.interval
                .start()
                .cmp(&b.interval.start())
                .then_with(|| a.interval.end().cmp(&b.interval.end()))
                .then_with(|| a.id.cmp(&b.id))
                .then_with(|| a.source_calendar_id.cmp(&b.source_calendar_id))
        });
        let before_dedup = events.len();
        events.dedup_by(|a, b| {
            a.id == b.id && a.source_calendar_id == b.source_calendar_id && a.interval == b.interval
        });

        let busy = merge_events(&events);
        debug!(
            events = events.len(),
            skipped,
            duplicates = before_dedup - events.len(),
            busy_blocks = busy.len(),
            "Timeline built"
        );

        Ok(Timeline { zone: target_zone, events, busy })
    }
}

/// Fold start-sorted events into disjoint busy blocks.
fn merge_events(events: &[Event]) -> Vec<BusyBlock> {
    let mut blocks: Vec<BusyBlock> = Vec::new();

    for event in events {
        match blocks.last_mut() {
            Some(block) if event.interval.start() < block.interval.end() => {
                block.interval = block.interval.hull(&event.interval);
                block.event_ids.push(event.id.clone());
                block.source_calendars.push(event.source_calendar_id.clone());
            }
            _ => blocks.push(BusyBlock {
                interval: event.interval,
                event_ids: vec![event.id.clone()],
                source_calendars: vec![event.source_calendar_id.clone()],
            }),
        }
    }

    for block in &mut blocks {
        block.source_calendars.sort();
        block.source_calendars.dedup();
    }
    blocks
}

/// Sort and merge arbitrary intervals with the same closed-open rule used for
/// events. Back-to-back intervals stay separate.
pub fn merge_intervals(intervals: impl IntoIterator<Item = Interval>) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals.into_iter().collect();
    sorted.sort_by(|a, b| a.start().cmp(&b.start()).then_with(|| a.end().cmp(&b.end())));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start() < last.end() => *last = last.hull(&interval),
            _ => merged.push(interval),
        }
    }
    merged
}

enum Stamp {
    Absolute(DateTime<FixedOffset>),
    Local(NaiveDateTime),
    Date(NaiveDate),
}

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn parse_stamp(raw: &str) -> Option<Stamp> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(Stamp::Absolute(instant));
    }
    if let Some(local) =
        LOCAL_FORMATS.iter().find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(Stamp::Local(local));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(Stamp::Date)
}

fn normalize_raw(raw: &RawEvent, target_zone: &Tz) -> Result<Interval, NormalizationReason> {
    let start_raw = present(raw.start.as_deref()).ok_or(NormalizationReason::MissingStart)?;
    let end_raw = present(raw.end.as_deref()).ok_or(NormalizationReason::MissingEnd)?;

    let event_zone = raw
        .timezone
        .as_deref()
        .map(|name| {
            name.parse::<Tz>().map_err(|_| NormalizationReason::UnknownTimezone(name.to_string()))
        })
        .transpose()?;

    let start = parse_stamp(start_raw)
        .ok_or_else(|| NormalizationReason::UnparseableTimestamp(start_raw.to_string()))?;
    let end = parse_stamp(end_raw)
        .ok_or_else(|| NormalizationReason::UnparseableTimestamp(end_raw.to_string()))?;

    // All-day dates are local to the event's zone, else to the working zone.
    let day_zone = event_zone.unwrap_or(*target_zone);
    let (start, end) = match (start, end) {
        (Stamp::Date(first), Stamp::Date(last)) if raw.is_all_day && last == first => {
            let next = first.succ_opt().ok_or(NormalizationReason::EndNotAfterStart)?;
            (date_instant(&day_zone, first, start_raw)?, date_instant(&day_zone, next, end_raw)?)
        }
        (start, end) => (
            stamp_instant(start, event_zone.as_ref(), &day_zone, start_raw)?,
            stamp_instant(end, event_zone.as_ref(), &day_zone, end_raw)?,
        ),
    };

    Interval::new(start, end)
        .map(|interval| interval.in_zone(target_zone))
        .map_err(|_| NormalizationReason::EndNotAfterStart)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn stamp_instant(
    stamp: Stamp,
    event_zone: Option<&Tz>,
    day_zone: &Tz,
    raw: &str,
) -> Result<DateTime<FixedOffset>, NormalizationReason> {
    match stamp {
        Stamp::Absolute(instant) => Ok(instant),
        Stamp::Local(local) => {
            let zone =
                event_zone.ok_or_else(|| NormalizationReason::MissingTimezone(raw.to_string()))?;
            resolve_local(zone, local)
                .map(|instant| instant.fixed_offset())
                .ok_or_else(|| NormalizationReason::NonexistentLocalTime(raw.to_string()))
        }
        Stamp::Date(date) => date_instant(day_zone, date, raw),
    }
}

fn date_instant(
    zone: &Tz,
    date: NaiveDate,
    raw: &str,
) -> Result<DateTime<FixedOffset>, NormalizationReason> {
    local_midnight(zone, date)
        .map(|instant| instant.fixed_offset())
        .ok_or_else(|| NormalizationReason::NonexistentLocalTime(raw.to_string()))
}
