//! Permissive timestamp parsing.
//!
//! Three strategies are tried in order:
//!
//! 1. integer epoch milliseconds (`1577836800000`)
//! 2. float epoch seconds (`1577836800.25`), scaled to milliseconds
//! 3. a calendar date string (`2020-01-01T00:00:00Z`, `01/31/2020`, `5 Jan 2020`, ...)
//!
//! Calendar strings without an offset are read as UTC. When a timezone is
//! supplied, the wall-clock value is placed in that zone instead and any
//! embedded offset is replaced.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

use super::coerce::parse_float;
use crate::error::{IngestError, Result};

/// Datetime layouts that carry their own UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Datetime layouts without an offset.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d %b %Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
    "%Y%m%dT%H%M%S",
];

/// Date-only layouts, read as midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%b %d %Y",
    "%b %d, %Y",
];

enum Calendar {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

/// Parse a raw value to epoch milliseconds using all three strategies.
pub fn parse_timestamp_ms(raw: &str, tz: Option<Tz>) -> Option<i64> {
    let trimmed = raw.trim();

    if let Ok(ms) = trimmed.parse::<i64>() {
        return Some(ms);
    }

    if let Some(seconds) = parse_float(trimmed) {
        if seconds.is_finite() {
            return Some((seconds * 1000.0).round() as i64);
        }
    }

    parse_calendar_ms(trimmed, tz)
}

/// Parse a calendar date string to epoch milliseconds.
///
/// Numeric epochs are not accepted here; see [`parse_timestamp_ms`].
pub fn parse_calendar_ms(raw: &str, tz: Option<Tz>) -> Option<i64> {
    match (parse_calendar(raw.trim())?, tz) {
        (Calendar::Naive(naive), Some(tz)) => localize(naive, tz),
        (Calendar::Offset(dt), Some(tz)) => localize(dt.naive_local(), tz),
        (Calendar::Naive(naive), None) => Some(naive.and_utc().timestamp_millis()),
        (Calendar::Offset(dt), None) => Some(dt.timestamp_millis()),
    }
}

/// Look up an IANA timezone name such as `America/New_York`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| IngestError::Config(format!("Unknown timezone '{}': {}", name, e)))
}

/// Earliest instant for a wall-clock time; None inside a DST gap.
fn localize(naive: NaiveDateTime, tz: Tz) -> Option<i64> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

fn parse_calendar(s: &str) -> Option<Calendar> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Calendar::Offset(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(Calendar::Offset(dt));
    }

    // A trailing Z is UTC on any of the naive layouts
    if let Some(body) = s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        return parse_naive(body).map(|naive| Calendar::Offset(naive.and_utc().fixed_offset()));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(Calendar::Offset(dt));
        }
    }

    parse_naive(s).map(Calendar::Naive)
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEW_YEAR_2020: i64 = 1_577_836_800_000;

    #[test]
    fn test_integer_epoch_ms() {
        assert_eq!(parse_timestamp_ms("1577836800000", None), Some(NEW_YEAR_2020));
        assert_eq!(parse_timestamp_ms("-5", None), Some(-5));
    }

    #[test]
    fn test_float_epoch_seconds() {
        assert_eq!(parse_timestamp_ms("1577836800.5", None), Some(NEW_YEAR_2020 + 500));
        assert_eq!(parse_timestamp_ms("41.2", None), Some(41_200));
    }

    #[test]
    fn test_rfc3339() {
        assert_eq!(parse_timestamp_ms("2020-01-01T00:00:00Z", None), Some(NEW_YEAR_2020));
        assert_eq!(
            parse_timestamp_ms("2020-01-01T02:00:00+02:00", None),
            Some(NEW_YEAR_2020)
        );
    }

    #[test]
    fn test_naive_forms_are_utc() {
        assert_eq!(parse_timestamp_ms("2020-01-01 00:00:00", None), Some(NEW_YEAR_2020));
        assert_eq!(parse_timestamp_ms("2020-01-01 00:00:00Z", None), Some(NEW_YEAR_2020));
        assert_eq!(parse_timestamp_ms("2020-01-01", None), Some(NEW_YEAR_2020));
        assert_eq!(parse_timestamp_ms("2020/01/01", None), Some(NEW_YEAR_2020));
        assert_eq!(parse_timestamp_ms("01/01/2020", None), Some(NEW_YEAR_2020));
        assert_eq!(parse_timestamp_ms("1 Jan 2020", None), Some(NEW_YEAR_2020));
        assert_eq!(parse_timestamp_ms("Jan 1, 2020", None), Some(NEW_YEAR_2020));
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(
            parse_timestamp_ms("2020-01-01T00:00:00.250", None),
            Some(NEW_YEAR_2020 + 250)
        );
    }

    #[test]
    fn test_timezone_replaces_wall_clock_zone() {
        let tz = parse_timezone("America/New_York").unwrap();
        let five_hours = 5 * 3_600_000;

        assert_eq!(
            parse_timestamp_ms("2020-01-01 00:00:00", Some(tz)),
            Some(NEW_YEAR_2020 + five_hours)
        );
        // The explicit offset is replaced, not honoured
        assert_eq!(
            parse_timestamp_ms("2020-01-01T00:00:00Z", Some(tz)),
            Some(NEW_YEAR_2020 + five_hours)
        );
        // Numeric epochs ignore the timezone
        assert_eq!(parse_timestamp_ms("1577836800000", Some(tz)), Some(NEW_YEAR_2020));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_timestamp_ms("", None), None);
        assert_eq!(parse_timestamp_ms("person", None), None);
        assert_eq!(parse_timestamp_ms("nan", None), None);
        assert_eq!(parse_timestamp_ms("2020-13-45", None), None);
    }

    #[test]
    fn test_calendar_only_rejects_numbers() {
        assert_eq!(parse_calendar_ms("1577836800000", None), None);
        assert_eq!(parse_calendar_ms("2020-01-01", None), Some(NEW_YEAR_2020));
    }

    #[test]
    fn test_unknown_timezone() {
        assert!(matches!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(IngestError::Config(_))
        ));
    }
}
