//! Closed-open time intervals anchored to absolute instants

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SchedulingError};

/// A half-open span `[start, end)` with `start < end`.
///
/// Both ends carry a UTC offset, so comparisons are always between absolute
/// instants. Use [`Interval::in_zone`] to re-express an interval in a named
/// zone; the instants never change, only their offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr", into = "IntervalRepr")]
pub struct Interval {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

#[derive(Serialize, Deserialize)]
struct IntervalRepr {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl TryFrom<IntervalRepr> for Interval {
    type Error = SchedulingError;

    fn try_from(repr: IntervalRepr) -> Result<Self> {
        Self::new(repr.start, repr.end)
    }
}

impl From<Interval> for IntervalRepr {
    fn from(interval: Interval) -> Self {
        Self { start: interval.start, end: interval.end }
    }
}

impl Interval {
    /// Build an interval, rejecting empty or inverted spans.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Result<Self> {
        if start >= end {
            return Err(SchedulingError::InvalidInput(format!(
                "interval start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build an interval from instants in any zone.
    pub fn from_instants<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Result<Self> {
        Self::new(start.fixed_offset(), end.fixed_offset())
    }

    /// Build `[start, start + length)`.
    pub fn starting_at(start: DateTime<FixedOffset>, length: Duration) -> Result<Self> {
        let end = start.checked_add_signed(length).ok_or_else(|| {
            SchedulingError::InvalidInput(format!("interval length {length} overflows"))
        })?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when `instant` lies in `[start, end)`.
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        let instant = instant.fixed_offset();
        self.start <= instant && instant < self.end
    }

    /// True when the two spans share at least one instant. Back-to-back
    /// intervals do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The part of `self` inside `bounds`, if any.
    pub fn clip_to(&self, bounds: &Interval) -> Option<Interval> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        (start < end).then_some(Interval { start, end })
    }

    /// Smallest interval covering both.
    pub fn hull(&self, other: &Interval) -> Interval {
        Interval { start: self.start.min(other.start), end: self.end.max(other.end) }
    }

    /// Same length, moved by `delta` (which may be negative).
    pub fn shifted_by(&self, delta: Duration) -> Result<Interval> {
        let overflow =
            || SchedulingError::InvalidInput(format!("shifting interval by {delta} overflows"));
        let start = self.start.checked_add_signed(delta).ok_or_else(overflow)?;
        let end = self.end.checked_add_signed(delta).ok_or_else(overflow)?;
        Ok(Interval { start, end })
    }

    /// Same start, new length.
    pub fn with_duration(&self, length: Duration) -> Result<Interval> {
        Self::starting_at(self.start, length)
    }

    /// Re-express both ends in `zone`. The instants are unchanged.
    pub fn in_zone<Tz: TimeZone>(&self, zone: &Tz) -> Interval {
        Interval {
            start: self.start.with_timezone(zone).fixed_offset(),
            end: self.end.with_timezone(zone).fixed_offset(),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
