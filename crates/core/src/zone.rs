//! Local wall-clock to absolute instant resolution
//!
//! All arithmetic happens on absolute instants. Local times are only used to
//! locate day boundaries and hour marks, and every lookup goes through the
//! zone's offset rules so DST transitions are honored.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use cadence_domain::Interval;

/// Gaps in real zones are at most a couple of hours; probe past them in
/// quarter-hour steps.
const GAP_PROBE_STEP_MINUTES: i64 = 15;
const GAP_PROBE_LIMIT_MINUTES: i64 = 180;

/// Resolve a local time strictly.
///
/// Ambiguous fall-back times take the earlier instant. Times inside a
/// spring-forward gap do not exist and yield `None`.
pub fn resolve_local(zone: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(instant) => Some(instant),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

/// Resolve a local time, moving times inside a gap to the first instant
/// after it. Used for boundaries such as midnight, which some zones skip.
pub fn resolve_local_lenient(zone: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    resolve_local(zone, local).or_else(|| {
        (1..=GAP_PROBE_LIMIT_MINUTES / GAP_PROBE_STEP_MINUTES).find_map(|step| {
            let probe = local.checked_add_signed(Duration::minutes(step * GAP_PROBE_STEP_MINUTES))?;
            resolve_local(zone, probe)
        })
    })
}

/// Start of `date` in `zone`.
pub fn local_midnight(zone: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    resolve_local_lenient(zone, date.and_time(NaiveTime::MIN))
}

/// Instant at `hour:00` on `date`; hour 24 is the next day's midnight.
pub fn local_hour(zone: &Tz, date: NaiveDate, hour: u8) -> Option<DateTime<Tz>> {
    if hour >= 24 {
        return local_midnight(zone, date.succ_opt()?);
    }
    let time = NaiveTime::from_hms_opt(u32::from(hour), 0, 0)?;
    resolve_local_lenient(zone, date.and_time(time))
}

/// `[start_hour, end_hour)` on `date`, as absolute instants. A 23- or
/// 25-hour DST day yields a correspondingly shorter or longer span.
pub fn local_span(zone: &Tz, date: NaiveDate, start_hour: u8, end_hour: u8) -> Option<Interval> {
    let start = local_hour(zone, date, start_hour)?;
    let end = local_hour(zone, date, end_hour)?;
    Interval::from_instants(&start, &end).ok().map(|span| span.in_zone(zone))
}

/// The whole local day.
pub fn local_day(zone: &Tz, date: NaiveDate) -> Option<Interval> {
    local_span(zone, date, 0, 24)
}

/// Calendar date of an instant as seen in `zone`.
pub fn local_date<Z: TimeZone>(zone: &Tz, instant: &DateTime<Z>) -> NaiveDate {
    instant.with_timezone(zone).date_naive()
}
