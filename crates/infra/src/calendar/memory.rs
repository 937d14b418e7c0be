//! In-memory calendar source for tests, demos and pre-fetched snapshots

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cadence_core::CalendarSource;
use cadence_domain::{Interval, RawEvent, Result};
use parking_lot::RwLock;
use tracing::debug;

use super::events_touching;

/// A calendar backed by a shared, replaceable list of raw events.
///
/// Clones share the same events, so a test can keep a handle and update the
/// calendar after handing it to a scheduler.
#[derive(Debug, Clone)]
pub struct InMemoryCalendarSource {
    id: String,
    events: Arc<RwLock<Vec<RawEvent>>>,
    latency: Option<Duration>,
}

impl InMemoryCalendarSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), events: Arc::new(RwLock::new(Vec::new())), latency: None }
    }

    pub fn with_events(self, events: Vec<RawEvent>) -> Self {
        *self.events.write() = events;
        self
    }

    /// Sleep this long before answering each fetch.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn push(&self, event: RawEvent) {
        self.events.write().push(event);
    }

    pub fn replace(&self, events: Vec<RawEvent>) {
        *self.events.write() = events;
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

#[async_trait]
impl CalendarSource for InMemoryCalendarSource {
    fn source_id(&self) -> &str {
        &self.id
    }

    async fn fetch_events(&self, window: &Interval) -> Result<Vec<RawEvent>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let snapshot = self.events.read().clone();
        let events = events_touching(window, snapshot, &self.id);
        debug!(source = %self.id, events = events.len(), "Fetched in-memory events");
        Ok(events)
    }
}
