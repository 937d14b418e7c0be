//! # Cadence Domain
//!
//! Scheduling domain types and models for Cadence.
//!
//! This crate contains:
//! - Interval, event, request, proposal and context-history types
//! - Domain error types and Result definitions
//! - Scheduler configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Cadence crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
