//! Calendar source adapters
//!
//! Implementations of [`cadence_core::CalendarSource`]:
//! - [`InMemoryCalendarSource`]: fixed event list, optional artificial latency
//! - [`JsonFileCalendarSource`]: a JSON array of raw events on disk

pub mod json_file;
pub mod memory;

use cadence_core::BusyItem;
use cadence_domain::{Interval, RawEvent};
use chrono_tz::Tz;

pub use json_file::JsonFileCalendarSource;
pub use memory::InMemoryCalendarSource;

/// Keep the events that touch `window` and stamp unlabeled ones with
/// `source_id`. Events that fail to normalize are kept so the core can report
/// them instead of silently losing them. Dates without a zone float with the
/// working zone, which a source does not know, so they are kept too.
pub(crate) fn events_touching(
    window: &Interval,
    events: impl IntoIterator<Item = RawEvent>,
    source_id: &str,
) -> Vec<RawEvent> {
    events
        .into_iter()
        .map(|mut event| {
            if event.source_calendar_id.is_empty() {
                event.source_calendar_id = source_id.to_string();
            }
            event
        })
        .filter(|event| {
            if is_floating_date(event) {
                return true;
            }
            match event.to_event(&Tz::UTC) {
                Ok(Some(normalized)) => normalized.interval.overlaps(window),
                Ok(None) => false,
                Err(_) => true,
            }
        })
        .collect()
}

fn is_floating_date(event: &RawEvent) -> bool {
    event.timezone.is_none()
        && event.start.as_deref().is_some_and(|start| start.trim().len() == "YYYY-MM-DD".len())
}
