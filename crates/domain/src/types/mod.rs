//! Domain types and models
//!
//! Everything the scheduling pipeline passes between stages: intervals,
//! raw and normalized events, the merged timeline, requests, ranked
//! proposals and per-session history entries.

pub mod context;
pub mod event;
pub mod interval;
pub mod proposal;
pub mod request;
pub mod summary;
pub mod timeline;

pub use context::{ContextEntry, ContextSnapshot, EntryToken};
pub use event::{Event, EventStatus, RawEvent};
pub use interval::Interval;
pub use proposal::{RankReason, SlotProposal};
pub use request::{HourRange, RelativeAdjustment, RelativeReference, SchedulingRequest};
pub use summary::DaySummary;
pub use timeline::{BusyBlock, Timeline};
