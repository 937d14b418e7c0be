//! Duration parsing from strings
//!
//! Configuration files and structured requests carry spans such as
//! `"45m"`, `"1h 30m"` or `"750ms"`; this module turns them into
//! `std::time::Duration`.

use std::time::Duration;

use thiserror::Error;

/// Error type for duration parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("Invalid duration format: {0}")]
    InvalidFormat(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Empty duration string")]
    EmptyString,
}

/// Parse a duration string into a Duration
///
/// Supported units: `ms`, `s`, `m`, `h`, `d`, `w`. Components may be
/// separated by whitespace and are summed.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cadence_common::time::duration::parse_duration;
///
/// assert_eq!(parse_duration("45m").unwrap(), Duration::from_secs(2700));
/// assert_eq!(parse_duration("1h 30m").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_duration("1s 500ms").unwrap(), Duration::from_millis(1500));
/// ```
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DurationParseError::EmptyString);
    }

    let mut total = Duration::ZERO;
    let mut current_number = String::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch.is_ascii_digit() || ch == '.' {
            current_number.push(ch);
            continue;
        }
        if ch.is_whitespace() {
            continue;
        }

        if current_number.is_empty() {
            return Err(DurationParseError::InvalidFormat(
                "Expected number before unit".to_string(),
            ));
        }

        let value: f64 = current_number
            .parse()
            .map_err(|_| DurationParseError::InvalidNumber(current_number.clone()))?;

        let seconds_per_unit = if ch == 'm' && chars.peek() == Some(&'s') {
            chars.next();
            0.001
        } else {
            match ch {
                's' => 1.0,
                'm' => 60.0,
                'h' => 3_600.0,
                'd' => 86_400.0,
                'w' => 604_800.0,
                _ => return Err(DurationParseError::UnknownUnit(ch.to_string())),
            }
        };

        total += Duration::from_secs_f64(value * seconds_per_unit);
        current_number.clear();
    }

    if !current_number.is_empty() {
        return Err(DurationParseError::InvalidFormat("Missing unit after number".to_string()));
    }

    Ok(total)
}
