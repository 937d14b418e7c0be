//! Shared helpers for `cadence-infra` integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::CalendarSource;
use cadence_domain::{Interval, RawEvent, Result, SchedulingError};
use chrono::{DateTime, FixedOffset};

pub fn at(stamp: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(stamp).unwrap()
}

pub fn span(start: &str, end: &str) -> Interval {
    Interval::new(at(start), at(end)).unwrap()
}

/// Calendar that always fails, counting how often it was asked.
#[derive(Default, Clone)]
pub struct FailingCalendarSource {
    calls: Arc<AtomicUsize>,
}

impl FailingCalendarSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarSource for FailingCalendarSource {
    fn source_id(&self) -> &str {
        "broken"
    }

    async fn fetch_events(&self, _window: &Interval) -> Result<Vec<RawEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SchedulingError::CalendarSource {
            source_id: "broken".to_string(),
            message: "upstream returned 503".to_string(),
        })
    }
}
