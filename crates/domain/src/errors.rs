//! Error types used throughout the scheduling engine
//!
//! Only malformed input is an error here. An empty proposal list is a
//! successful outcome and an unresolvable relative reference falls back to a
//! fresh request, so neither has a variant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a calendar event could not be turned into an absolute interval.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum NormalizationReason {
    #[error("missing start timestamp")]
    MissingStart,

    #[error("missing end timestamp")]
    MissingEnd,

    #[error("unparseable timestamp `{0}`")]
    UnparseableTimestamp(String),

    #[error("local timestamp `{0}` has no timezone to resolve it in")]
    MissingTimezone(String),

    #[error("unknown timezone `{0}`")]
    UnknownTimezone(String),

    #[error("local time `{0}` does not exist in its timezone")]
    NonexistentLocalTime(String),

    #[error("end is not after start")]
    EndNotAfterStart,
}

/// A single event failed normalization. Fatal for the request that carried it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("event `{event_id}` could not be normalized: {reason}")]
pub struct NormalizationError {
    pub event_id: String,
    pub reason: NormalizationReason,
}

impl NormalizationError {
    pub fn new(event_id: impl Into<String>, reason: NormalizationReason) -> Self {
        Self { event_id: event_id.into(), reason }
    }
}

/// Main error type for Cadence
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SchedulingError {
    #[error("Normalization error: {0}")]
    Normalization(#[from] NormalizationError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calendar source `{source_id}` failed: {message}")]
    CalendarSource { source_id: String, message: String },

    #[error("Timed out after {after_ms}ms: {operation}")]
    Timeout { operation: String, after_ms: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SchedulingError {
    /// Stable, low-cardinality label for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normalization(_) => "normalization",
            Self::InvalidInput(_) => "invalid_input",
            Self::Config(_) => "config",
            Self::CalendarSource { .. } => "calendar_source",
            Self::Timeout { .. } => "timeout",
            Self::Internal(_) => "internal",
        }
    }

    /// True when the failure came from the caller's data rather than from
    /// an external collaborator.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Normalization(_) | Self::InvalidInput(_))
    }
}

/// Result type alias for Cadence operations
pub type Result<T> = std::result::Result<T, SchedulingError>;
