//! Port interfaces for calendar collaborators
//!
//! Adapters live in `cadence-infra`. The core never retries or caches.

use async_trait::async_trait;
use cadence_domain::{Interval, RawEvent, Result};

/// A connected calendar that can list the events overlapping a window.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Stable identifier used as `source_calendar_id` and in error reports.
    fn source_id(&self) -> &str;

    /// Fetch the concrete (already expanded) events touching `window`
    async fn fetch_events(&self, window: &Interval) -> Result<Vec<RawEvent>>;
}
