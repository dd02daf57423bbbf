//! Display derivations for catalog records.
//!
//! These are pure functions shared by the card view and anything else that
//! needs to present a [`Video`](crate::Video) to a person.

use chrono::{DateTime, Utc};

const SIZE_UNITS: [&str; 6] = ["B", "kB", "MB", "GB", "TB", "PB"];

/// Format a duration in seconds as `m:ss`.
///
/// Seconds are rounded before splitting, so 59.6 renders as `1:00` rather
/// than `0:60`. Negative and non-finite input renders as `0:00`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format a byte count using decimal (SI) units with up to two decimals.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1000 {
        return format!("{} B", bytes);
    }

    let mut exponent = 0;
    let mut value = bytes as f64;
    while value >= 1000.0 && exponent < SIZE_UNITS.len() - 1 {
        value /= 1000.0;
        exponent += 1;
    }
    value = round2(value);

    // 999_999 B rounds to 1000 kB; carry into the next unit
    if value >= 1000.0 && exponent < SIZE_UNITS.len() - 1 {
        exponent += 1;
        value = round2(value / 1000.0);
    }

    format!("{} {}", trim_decimals(value), SIZE_UNITS[exponent])
}

/// Percentage of the original size saved by compression.
///
/// Returns 0 when the original size is 0. The result is negative when the
/// compressed file is larger than the original.
pub fn compression_percentage(original_size: u64, compressed_size: u64) -> i64 {
    if original_size == 0 {
        return 0;
    }
    let ratio = compressed_size as f64 / original_size as f64;
    // Half-way values round towards positive infinity
    ((1.0 - ratio) * 100.0 + 0.5).floor() as i64
}

/// Describe `then` relative to `now` ("3 days ago", "in an hour").
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then).num_seconds();
    let phrase = relative_phrase(delta.unsigned_abs() as f64);

    if delta < 0 {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

fn relative_phrase(secs: f64) -> String {
    let seconds = secs.round();
    let minutes = (secs / 60.0).round();
    let hours = (secs / 3600.0).round();
    let days = (secs / 86_400.0).round();
    let months = (secs / 86_400.0 / 30.4375).round();
    let years = (secs / 86_400.0 / 365.25).round();

    if seconds <= 44.0 {
        "a few seconds".to_string()
    } else if seconds <= 89.0 {
        "a minute".to_string()
    } else if minutes <= 44.0 {
        format!("{} minutes", minutes)
    } else if minutes <= 89.0 {
        "an hour".to_string()
    } else if hours <= 21.0 {
        format!("{} hours", hours)
    } else if hours <= 35.0 {
        "a day".to_string()
    } else if days <= 25.0 {
        format!("{} days", days)
    } else if days <= 45.0 {
        "a month".to_string()
    } else if months <= 10.0 {
        format!("{} months", months)
    } else if months <= 17.0 {
        "a year".to_string()
    } else {
        format!("{} years", years.max(2.0))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn trim_decimals(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(125.0), "2:05");
        assert_eq!(format_duration(59.0), "0:59");
        assert_eq!(format_duration(59.6), "1:00");
        assert_eq!(format_duration(3600.0), "60:00");
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(-3.0), "0:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(999), "999 B");
        assert_eq!(format_size(1000), "1 kB");
        assert_eq!(format_size(1500), "1.5 kB");
        assert_eq!(format_size(1_234_567), "1.23 MB");
        assert_eq!(format_size(999_999), "1 MB");
        assert_eq!(format_size(5_000_000_000), "5 GB");
    }

    #[test]
    fn test_compression_percentage() {
        assert_eq!(compression_percentage(1000, 250), 75);
        assert_eq!(compression_percentage(1000, 1000), 0);
        assert_eq!(compression_percentage(1000, 0), 100);
        assert_eq!(compression_percentage(3, 1), 67);
    }

    #[test]
    fn test_compression_percentage_zero_original() {
        assert_eq!(compression_percentage(0, 0), 0);
        assert_eq!(compression_percentage(0, 500), 0);
    }

    #[test]
    fn test_compression_percentage_growth_is_negative() {
        assert_eq!(compression_percentage(1000, 1500), -50);
    }

    #[test]
    fn test_relative_time_past() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now - Duration::seconds(30), now), "a few seconds ago");
        assert_eq!(format_relative_time(now - Duration::seconds(60), now), "a minute ago");
        assert_eq!(format_relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(format_relative_time(now - Duration::minutes(60), now), "an hour ago");
        assert_eq!(format_relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(format_relative_time(now - Duration::hours(30), now), "a day ago");
        assert_eq!(format_relative_time(now - Duration::days(3), now), "3 days ago");
        assert_eq!(format_relative_time(now - Duration::days(40), now), "a month ago");
        assert_eq!(format_relative_time(now - Duration::days(120), now), "4 months ago");
        assert_eq!(format_relative_time(now - Duration::days(400), now), "a year ago");
        assert_eq!(format_relative_time(now - Duration::days(1100), now), "3 years ago");
    }

    #[test]
    fn test_relative_time_future() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now + Duration::hours(2), now), "in 2 hours");
    }
}
