//! # Cadence Infrastructure
//!
//! Infrastructure implementations of core ports and the async edge.
//!
//! This crate contains:
//! - Configuration loading (environment, JSON/TOML files)
//! - Tracing subscriber setup
//! - Calendar source adapters (in-memory, JSON file)
//! - The async [`AssistantScheduler`] that fetches events and drives the core
//!
//! ## Architecture
//! - Implements traits defined in `cadence-core`
//! - Depends on `cadence-common`, `cadence-domain` and `cadence-core`
//! - Contains all "impure" code (I/O, timeouts, global subscribers)

pub mod calendar;
pub mod config;
pub mod observability;
pub mod scheduler;

// Re-export commonly used items
pub use calendar::{InMemoryCalendarSource, JsonFileCalendarSource};
pub use observability::init_tracing;
pub use scheduler::{AssistantScheduler, SchedulingResult};
