//! Lenient date parsing for upstream date text.
//!
//! Mirrors what a browser's `Date.parse` accepts for the shapes Socrata
//! publishes: a calendar date optionally followed by a time of day and a
//! UTC offset. The result is milliseconds since the Unix epoch, or `None`
//! for text that is not a date (the "not a number" case).

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses `s` into milliseconds since the Unix epoch.
///
/// Accepted shapes (surrounding whitespace ignored):
///
/// - `YYYY`, `YYYY-MM`, `YYYY-MM-DD` (midnight UTC)
/// - `YYYY-MM-DDTHH:MM`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DDTHH:MM:SS.fff`
///   (read as UTC), each optionally followed by `Z` or `±HH:MM`
#[must_use]
pub fn parse_date_millis(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if s.contains('T') {
        return parse_date_time(s);
    }

    parse_date_only(s)
}

fn parse_date_only(s: &str) -> Option<i64> {
    let mut parts = s.split('-');
    let year = parse_digits(parts.next()?, 4)?;
    let month = parts.next().map_or(Some(1), |m| parse_digits(m, 2))?;
    let day = parts.next().map_or(Some(1), |d| parse_digits(d, 2))?;
    if parts.next().is_some() {
        return None;
    }

    let year = i32::try_from(year).ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

fn parse_date_time(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.timestamp_millis());
    }

    let naive = s.strip_suffix('Z').unwrap_or(s);
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    None
}

/// Parses an all-digit field of exactly `len` characters.
fn parse_digits(s: &str, len: usize) -> Option<u32> {
    if s.len() != len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
