//! Scheduling constants
//!
//! Centralized location for all domain-level defaults used throughout the
//! engine.

// Configuration defaults
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_CONTEXT_CAPACITY: usize = 20;
pub const DEFAULT_MAX_PROPOSALS: usize = 5;
pub const DEFAULT_SEARCH_DAYS: u32 = 7; // one week ahead
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 2_000;

// Working hours ("professional hours")
pub const DEFAULT_WORKDAY_START_HOUR: u8 = 9;
pub const DEFAULT_WORKDAY_END_HOUR: u8 = 17;

// Ranking
pub const WEEK_EDGE_SPLIT_HOUR: u8 = 12; // Monday before / Friday from this hour
pub const SCORE_PREFERRED_TIER: f64 = 1_000_000.0;
pub const SCORE_PER_DAY_DISTANCE: f64 = 1_000.0;
pub const SCORE_MAX_DAY_DISTANCE: i64 = 999; // keeps the preferred tier on top
pub const SCORE_WEEK_EDGE_PENALTY: f64 = 10.0;
pub const SCORE_NON_FRAGMENTING_BONUS: f64 = 1.0;

// Day summary thresholds (free minutes)
pub const SUMMARY_FREE_MINUTES: i64 = 360;
pub const SUMMARY_AVAILABLE_MINUTES: i64 = 180;
pub const SUMMARY_LEFT_MINUTES: i64 = 60;
