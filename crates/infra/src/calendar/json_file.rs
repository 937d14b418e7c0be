//! Calendar source reading a JSON export from disk
//!
//! The file holds an array of raw events in the same shape the calendar
//! collaborator produces:
//!
//! ```json
//! [
//!   { "id": "standup", "start": "2024-05-01T09:00:00-07:00", "end": "2024-05-01T09:15:00-07:00" },
//!   { "id": "offsite", "start": "2024-05-03", "end": "2024-05-04", "is_all_day": true,
//!     "timezone": "America/Los_Angeles" }
//! ]
//! ```
//!
//! The file is re-read on every fetch.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cadence_core::CalendarSource;
use cadence_domain::{Interval, RawEvent, Result, SchedulingError};
use tracing::{debug, instrument};

use super::events_touching;

#[derive(Debug, Clone)]
pub struct JsonFileCalendarSource {
    id: String,
    path: PathBuf,
}

impl JsonFileCalendarSource {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { id: id.into(), path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn failure(&self, message: String) -> SchedulingError {
        SchedulingError::CalendarSource { source_id: self.id.clone(), message }
    }
}

#[async_trait]
impl CalendarSource for JsonFileCalendarSource {
    fn source_id(&self) -> &str {
        &self.id
    }

    #[instrument(skip(self, window), fields(source = %self.id, path = %self.path.display()))]
    async fn fetch_events(&self, window: &Interval) -> Result<Vec<RawEvent>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.failure(format!("failed to read {}: {e}", self.path.display())))?;

        let events: Vec<RawEvent> = serde_json::from_str(&contents)
            .map_err(|e| self.failure(format!("invalid event file: {e}")))?;

        let total = events.len();
        let events = events_touching(window, events, &self.id);
        debug!(total, in_window = events.len(), "Loaded events from file");
        Ok(events)
    }
}
