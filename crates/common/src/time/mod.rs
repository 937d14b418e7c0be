//! Time utilities and abstractions
//!
//! - **[`clock`]**: Wall-clock abstraction with a controllable mock for tests
//! - **[`duration`]**: Human duration parsing (`"1h 30m"`, `"500ms"`)
//! - **[`format`]**: Human-readable duration formatting
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use cadence_common::time::{format_duration, parse_duration};
//!
//! let formatted = format_duration(Duration::from_secs(5400));
//! assert_eq!(formatted, "1h 30m");
//!
//! let duration = parse_duration("2h 30m").unwrap();
//! assert_eq!(duration, Duration::from_secs(9000));
//! ```

#[cfg(feature = "runtime")]
pub mod clock;
pub mod duration;
pub mod format;

// Re-export commonly used items
#[cfg(feature = "runtime")]
pub use clock::{Clock, MockClock, SystemClock};
pub use duration::{parse_duration, DurationParseError};
pub use format::format_duration;
