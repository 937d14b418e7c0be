//! # Cadence Core
//!
//! Pure scheduling logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Event normalization and timeline merging
//! - Free-slot search and ranking
//! - Per-session context memory and the coordinator that ties them together
//! - Port interfaces (traits) for calendar collaborators
//!
//! ## Architecture Principles
//! - Only depends on `cadence-common` and `cadence-domain`
//! - No network, file or platform code
//! - Calendars come in through [`CalendarSource`]
//! - Every resolution is a synchronous computation over an event snapshot

pub mod availability;
pub mod context_memory;
pub mod coordinator;
pub mod free_slots;
pub mod ports;
pub mod ranking;
pub mod session;
pub mod timeline;
pub mod zone;

pub use availability::{summarize_day, DaySummarizer};
pub use context_memory::ContextMemory;
pub use coordinator::{PlannedRequest, Resolution, SchedulingCoordinator};
pub use free_slots::{find_free, FreeSlotFinder};
pub use ports::CalendarSource;
pub use ranking::SlotRanker;
pub use session::{SchedulingResult, SchedulingService};
pub use timeline::{merge_intervals, BusyItem, EventTimeline};
