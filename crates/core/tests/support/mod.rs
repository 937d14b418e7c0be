//! Shared fixtures for `cadence-core` integration tests.
//!
//! Keeps timestamps readable (`at("2024-05-01T09:00:00Z")`) so scenario tests
//! can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

use std::sync::Arc;

use cadence_common::time::MockClock;
use cadence_core::{SchedulingCoordinator, SchedulingService};
use cadence_domain::{Interval, RawEvent, SchedulingRequest};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use chrono_tz::Tz;

pub fn at(stamp: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(stamp).unwrap()
}

pub fn span(start: &str, end: &str) -> Interval {
    Interval::new(at(start), at(end)).unwrap()
}

/// Busy event on the default `work` calendar.
pub fn busy(id: &str, start: &str, end: &str) -> RawEvent {
    RawEvent::new(id, "work", start, end)
}

pub fn busy_on(source: &str, id: &str, start: &str, end: &str) -> RawEvent {
    RawEvent::new(id, source, start, end)
}

pub fn request(minutes: i64, start: &str, end: &str) -> SchedulingRequest {
    SchedulingRequest::new(Duration::minutes(minutes), span(start, end)).unwrap()
}

/// Clock frozen at 2024-05-01 08:00 UTC, shared with the caller.
pub fn frozen_clock() -> MockClock {
    MockClock::at(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())
}

pub fn coordinator(zone: Tz) -> SchedulingCoordinator {
    SchedulingCoordinator::new(zone).with_clock(Arc::new(frozen_clock()))
}

pub fn service(zone: Tz, capacity: usize) -> SchedulingService {
    SchedulingService::new(coordinator(zone), capacity)
}
