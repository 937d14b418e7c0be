//! Calendar events, raw and normalized

use serde::{Deserialize, Serialize};

use super::interval::Interval;
use crate::impl_domain_status_conversions;

/// Attendance status reported by the calendar provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

impl_domain_status_conversions!(EventStatus {
    Confirmed => "confirmed",
    Tentative => "tentative",
    Cancelled => "cancelled",
});

impl EventStatus {
    /// Whether the event occupies time on the calendar.
    pub fn blocks_time(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// An event exactly as a calendar collaborator hands it over.
///
/// `start`/`end` accept RFC 3339 timestamps with an offset, naive local
/// timestamps (`2024-03-10T02:30:00`, resolved in `timezone`), or plain
/// dates for all-day events. Nothing is validated until the event is
/// normalized onto a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub source_calendar_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub attendee_count: u32,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub status: Option<EventStatus>,
}

impl RawEvent {
    pub fn new(
        id: impl Into<String>,
        source_calendar_id: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start: Some(start.into()),
            end: Some(end.into()),
            timezone: None,
            source_calendar_id: source_calendar_id.into(),
            title: None,
            attendee_count: 0,
            is_all_day: false,
            status: None,
        }
    }

    /// An all-day event spanning `start_date` up to (not including) `end_date`.
    pub fn all_day(
        id: impl Into<String>,
        source_calendar_id: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self { is_all_day: true, ..Self::new(id, source_calendar_id, start_date, end_date) }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_attendees(mut self, attendee_count: u32) -> Self {
        self.attendee_count = attendee_count;
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn effective_status(&self) -> EventStatus {
        self.status.unwrap_or_default()
    }
}

/// A normalized event: absolute interval plus the calendar it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub interval: Interval,
    pub source_calendar_id: String,
    pub title: Option<String>,
    pub attendee_count: u32,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        interval: Interval,
        source_calendar_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            interval,
            source_calendar_id: source_calendar_id.into(),
            title: None,
            attendee_count: 0,
        }
    }
}
