//! Wall-clock timestamp helpers.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

/// Represents a timestamp that can be serialized/deserialized.
pub type Timestamp = DateTime<Utc>;

/// Format used for terminal log lines: 24-hour `HH:MM:SS`.
pub const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Returns the current local wall-clock time as `HH:MM:SS`.
///
/// # Examples
///
/// ```
/// use agentwizard::utils::clock_timestamp;
///
/// let ts = clock_timestamp();
/// assert_eq!(ts.len(), 8);
/// assert_eq!(ts.matches(':').count(), 2);
/// ```
#[must_use]
pub fn clock_timestamp() -> String {
    format_clock(&Local::now())
}

/// Formats any zoned datetime as `HH:MM:SS`.
#[must_use]
pub fn format_clock<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(CLOCK_FORMAT).to_string()
}

/// Returns the current UTC timestamp.
#[must_use]
pub fn now_utc() -> Timestamp {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock_pads_fields() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 3).unwrap();
        assert_eq!(format_clock(&at), "07:05:03");
    }

    #[test]
    fn test_format_clock_is_24_hour() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap();
        assert_eq!(format_clock(&at), "23:59:59");
    }
}
