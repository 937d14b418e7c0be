//! Normalized busy timeline

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::event::Event;
use super::interval::Interval;

/// One merged overlap group of events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyBlock {
    pub interval: Interval,
    /// Ids of every event folded into this block, in start order.
    pub event_ids: Vec<String>,
    /// Distinct source calendars contributing to this block, sorted.
    pub source_calendars: Vec<String>,
}

/// Events and busy blocks expressed in a single working zone.
///
/// `events` are sorted by start; `busy` blocks are disjoint and sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub zone: Tz,
    pub events: Vec<Event>,
    pub busy: Vec<BusyBlock>,
}

impl Timeline {
    /// A timeline with nothing scheduled.
    pub fn empty(zone: Tz) -> Self {
        Self { zone, events: Vec::new(), busy: Vec::new() }
    }

    pub fn busy_intervals(&self) -> impl Iterator<Item = Interval> + '_ {
        self.busy.iter().map(|block| block.interval)
    }

    /// Events overlapping `window`.
    pub fn events_within<'a>(&'a self, window: &'a Interval) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |event| event.interval.overlaps(window))
    }

    pub fn is_empty(&self) -> bool {
        self.busy.is_empty()
    }
}
