//! Human-readable duration formatting

use std::time::Duration;

/// Format a duration into a human-readable string, omitting zero components.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cadence_common::time::format::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45 * 60)), "45m");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// assert_eq!(format_duration(Duration::from_secs(3665)), "1h 1m 5s");
/// assert_eq!(format_duration(Duration::ZERO), "0s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();

    if total_secs == 0 {
        let millis = duration.as_millis();
        return if millis == 0 { "0s".to_string() } else { format!("{millis}ms") };
    }

    let days = total_secs / 86400;
    let hours = (total_secs % 86400) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    [(days, "d"), (hours, "h"), (minutes, "m"), (seconds, "s")]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, suffix)| format!("{value}{suffix}"))
        .collect::<Vec<_>>()
        .join(" ")
}
