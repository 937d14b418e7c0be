//! Structured scheduling requests
//!
//! Requests arrive already parsed from whatever front end produced them;
//! nothing here interprets free-form text.

use chrono::{Duration, Timelike};
use serde::{Deserialize, Serialize};

use super::context::EntryToken;
use super::interval::Interval;
use crate::errors::{Result, SchedulingError};

/// Serde adapter storing a `chrono::Duration` as whole signed seconds.
pub mod span_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(span: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(span.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Duration::try_seconds(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("span of {secs}s is out of range")))
    }
}

/// A time-of-day range `[start_hour, end_hour)` in the working zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "HourRangeRepr", into = "HourRangeRepr")]
pub struct HourRange {
    start_hour: u8,
    end_hour: u8,
}

#[derive(Serialize, Deserialize)]
struct HourRangeRepr {
    start_hour: u8,
    end_hour: u8,
}

impl TryFrom<HourRangeRepr> for HourRange {
    type Error = SchedulingError;

    fn try_from(repr: HourRangeRepr) -> Result<Self> {
        Self::new(repr.start_hour, repr.end_hour)
    }
}

impl From<HourRange> for HourRangeRepr {
    fn from(range: HourRange) -> Self {
        Self { start_hour: range.start_hour, end_hour: range.end_hour }
    }
}

impl HourRange {
    /// Requires `start_hour < end_hour <= 24`.
    pub fn new(start_hour: u8, end_hour: u8) -> Result<Self> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(SchedulingError::InvalidInput(format!(
                "hour range {start_hour}..{end_hour} must satisfy start < end <= 24"
            )));
        }
        Ok(Self { start_hour, end_hour })
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u8 {
        self.end_hour
    }

    /// Whether a wall-clock time falls inside the range.
    pub fn contains_time<T: Timelike>(&self, time: &T) -> bool {
        let minute_of_day = time.hour() * 60 + time.minute();
        u32::from(self.start_hour) * 60 <= minute_of_day
            && minute_of_day < u32::from(self.end_hour) * 60
    }
}

/// Which earlier turn a follow-up request refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RelativeReference {
    /// The most recent turn.
    Latest,
    /// `n` turns before the most recent one (`StepsBack(0)` is the latest).
    StepsBack(usize),
    /// The turn that produced this token.
    Token(EntryToken),
}

/// "Adjust previous" semantics: move the referenced result by `shift` and
/// optionally reuse its duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeAdjustment {
    pub reference: RelativeReference,
    #[serde(with = "span_seconds", default = "Duration::zero")]
    pub shift: Duration,
    #[serde(default)]
    pub keep_duration: bool,
}

impl RelativeAdjustment {
    pub fn new(reference: RelativeReference, shift: Duration) -> Self {
        Self { reference, shift, keep_duration: false }
    }

    pub fn keeping_duration(mut self) -> Self {
        self.keep_duration = true;
        self
    }
}

/// A structured request for meeting slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingRequest {
    #[serde(with = "span_seconds")]
    pub duration: Duration,
    pub search_window: Interval,
    #[serde(default)]
    pub preferred_times_of_day: Vec<HourRange>,
    #[serde(default)]
    pub relative: Option<RelativeAdjustment>,
    #[serde(default)]
    pub participants: Vec<String>,
    /// Propose whole free gaps instead of clipping to `duration`.
    #[serde(default)]
    pub full_gap: bool,
}

impl SchedulingRequest {
    pub fn new(duration: Duration, search_window: Interval) -> Result<Self> {
        let request = Self {
            duration,
            search_window,
            preferred_times_of_day: Vec::new(),
            relative: None,
            participants: Vec::new(),
            full_gap: false,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn with_preferred(mut self, range: HourRange) -> Self {
        self.preferred_times_of_day.push(range);
        self
    }

    pub fn with_relative(mut self, adjustment: RelativeAdjustment) -> Self {
        self.relative = Some(adjustment);
        self
    }

    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants.extend(participants.into_iter().map(Into::into));
        self
    }

    pub fn with_full_gap(mut self) -> Self {
        self.full_gap = true;
        self
    }

    /// Checks invariants that deserialization alone cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if self.duration <= Duration::zero() {
            return Err(SchedulingError::InvalidInput(format!(
                "duration must be positive, got {}s",
                self.duration.num_seconds()
            )));
        }
        Ok(())
    }

    /// Whether `time` falls in any preferred range. No ranges means no
    /// preference, so nothing is "preferred".
    pub fn is_preferred_time<T: Timelike>(&self, time: &T) -> bool {
        self.preferred_times_of_day.iter().any(|range| range.contains_time(time))
    }
}
