//! Time normalization for schedule events.
//!
//! Schedules publish instants as ISO-8601-like strings, sometimes with an
//! offset and sometimes without. This module parses them, converts them to
//! UTC Unix timestamps and renders the local `HH:MM` wall-clock strings used
//! for display.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Formats tried for timestamps that carry a numeric offset.
const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
    "%Y%m%dT%H%M%S%.f%z",
    "%Y%m%dT%H%M%z",
];

/// Formats tried for timestamps without any offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

/// Formats tried for bare dates, taken as midnight UTC.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Zone names read as UTC when they end a timestamp.
const UTC_NAMES: &[&str] = &["UTC", "GMT", "Z"];

/// A timestamp string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized timestamp {value:?}")]
pub struct TimestampError {
    /// The offending input.
    pub value: String,
}

/// A timezone name is not a known IANA identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timezone {name:?}")]
pub struct TimezoneError {
    /// The offending name.
    pub name: String,
}

/// Parses an ISO-8601-like timestamp.
///
/// Accepts RFC 3339 as well as the looser forms schedules tend to use: a
/// space instead of `T`, missing seconds, fractional seconds, the basic
/// `20240110T100000` layout, `±HHMM` and hour-only `±HH` offsets, a trailing
/// `Z`, `UTC` or `GMT`, and bare dates. Input without an offset is taken to
/// be UTC.
///
/// # Errors
///
/// Returns [`TimestampError`] when none of the accepted forms match.
pub fn parse_instant(value: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }

    let zoned = normalize_zone(trimmed);
    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, format) {
            return Ok(dt);
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        });

    match naive {
        Some(naive) => {
            tracing::trace!(value = %trimmed, "timestamp has no offset, assuming UTC");
            Ok(naive.and_utc().fixed_offset())
        }
        None => Err(TimestampError {
            value: value.to_string(),
        }),
    }
}

/// Rewrites zone designators `%z` cannot read into `±HH:MM`.
fn normalize_zone(value: &str) -> String {
    for name in UTC_NAMES {
        if let Some(rest) = strip_suffix_ignore_case(value, name) {
            return format!("{}+00:00", rest.trim_end());
        }
    }
    pad_hour_offset(value).unwrap_or_else(|| value.to_string())
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (rest, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(rest)
}

/// `2024-01-10T10:00:00+01` becomes `2024-01-10T10:00:00+01:00`. Only a
/// sign after the time separator counts, so the day of a bare date is
/// never mistaken for an offset.
fn pad_hour_offset(value: &str) -> Option<String> {
    let time_start = value.find(['T', 't', ' '])?;
    let bytes = value.as_bytes();
    let sign = bytes.len().checked_sub(3)?;
    let is_offset = sign > time_start
        && matches!(bytes[sign], b'+' | b'-')
        && bytes[sign + 1..].iter().all(u8::is_ascii_digit);
    is_offset.then(|| format!("{value}:00"))
}

/// Resolves an IANA timezone name such as `Europe/London`.
///
/// # Errors
///
/// Returns [`TimezoneError`] when the name is not in the timezone database.
pub fn resolve_timezone(name: &str) -> Result<Tz, TimezoneError> {
    name.trim().parse::<Tz>().map_err(|_| TimezoneError {
        name: name.to_string(),
    })
}

/// Converts an instant to whole seconds since the Unix epoch, in UTC.
///
/// Sub-second precision is discarded by flooring.
pub fn to_unix_seconds<Z: TimeZone>(instant: &DateTime<Z>) -> i64 {
    instant.with_timezone(&Utc).timestamp()
}

/// Formats the wall-clock time of an instant in its own zone as `HH:MM`.
pub fn display_hhmm<Z: TimeZone>(instant: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    instant.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    mod parsing {
        use super::*;

        #[test]
        fn rfc3339_with_offset() {
            let dt = parse_instant("2024-01-10T10:00:00+01:00").unwrap();
            assert_eq!(dt.offset().local_minus_utc(), 3600);
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 9, 0, 0));
        }

        #[test]
        fn rfc3339_zulu() {
            let dt = parse_instant("2024-01-10T10:00:00Z").unwrap();
            assert_eq!(dt.offset().local_minus_utc(), 0);
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 10, 0, 0));
        }

        #[test]
        fn space_separator_and_zulu() {
            let dt = parse_instant("2024-01-10 10:00:00Z").unwrap();
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 10, 0, 0));
        }

        #[test]
        fn compact_offset() {
            let dt = parse_instant("2024-01-10T10:00:00+0200").unwrap();
            assert_eq!(dt.offset().local_minus_utc(), 7200);
            assert_eq!(dt.hour(), 10);
        }

        #[test]
        fn without_seconds() {
            let dt = parse_instant("2024-01-10T10:15+02:00").unwrap();
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 8, 15, 0));
        }

        #[test]
        fn fractional_seconds() {
            let dt = parse_instant("2024-01-10T10:00:00.750+00:00").unwrap();
            assert_eq!(dt.nanosecond(), 750_000_000);
        }

        #[test]
        fn naive_is_utc() {
            let dt = parse_instant("2024-01-10T10:00:00").unwrap();
            assert_eq!(dt.offset().local_minus_utc(), 0);
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 10, 0, 0));
        }

        #[test]
        fn bare_date_is_midnight_utc() {
            let dt = parse_instant("2024-01-10").unwrap();
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 0, 0, 0));
        }

        #[test]
        fn surrounding_whitespace() {
            let dt = parse_instant("\n  2024-01-10T10:00:00+00:00  ").unwrap();
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 10, 0, 0));
        }

        #[test]
        fn hour_only_offset() {
            let dt = parse_instant("2024-01-10T10:00:00+01").unwrap();
            assert_eq!(dt.offset().local_minus_utc(), 3600);
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 9, 0, 0));

            let dt = parse_instant("2024-01-10 10:00-05").unwrap();
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 15, 0, 0));
        }

        #[test]
        fn basic_format() {
            let dt = parse_instant("20240110T100000Z").unwrap();
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 10, 0, 0));

            let dt = parse_instant("20240110T103000+0100").unwrap();
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 9, 30, 0));

            let dt = parse_instant("20240110T1030").unwrap();
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 10, 30, 0));

            let dt = parse_instant("20240110").unwrap();
            assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 0, 0, 0));
        }

        #[test]
        fn utc_zone_names() {
            for value in [
                "2024-01-10T10:00:00 UTC",
                "2024-01-10 10:00:00 GMT",
                "2024-01-10T10:00:00utc",
            ] {
                let dt = parse_instant(value).unwrap();
                assert_eq!(dt.offset().local_minus_utc(), 0, "{value}");
                assert_eq!(dt.with_timezone(&Utc), utc(2024, 1, 10, 10, 0, 0), "{value}");
            }
        }

        #[test]
        fn rejects_garbage() {
            let err = parse_instant("next tuesday").unwrap_err();
            assert_eq!(err.value, "next tuesday");
        }

        #[test]
        fn rejects_empty() {
            assert!(parse_instant("").is_err());
        }
    }

    mod timezones {
        use super::*;

        #[test]
        fn resolves_iana_names() {
            assert_eq!(resolve_timezone("Europe/London").unwrap(), Tz::Europe__London);
            assert_eq!(resolve_timezone("UTC").unwrap(), Tz::UTC);
        }

        #[test]
        fn rejects_unknown_names() {
            let err = resolve_timezone("Mars/Olympus_Mons").unwrap_err();
            assert_eq!(err.name, "Mars/Olympus_Mons");
            assert!(err.to_string().contains("Mars/Olympus_Mons"));
        }
    }

    mod normalization {
        use super::*;

        #[test]
        fn unix_seconds_from_offset_instant() {
            let dt = parse_instant("2024-01-10T10:00:00+00:00").unwrap();
            assert_eq!(to_unix_seconds(&dt), 1_704_880_800);
        }

        #[test]
        fn unix_seconds_ignore_declared_offset() {
            let a = parse_instant("2024-01-10T11:00:00+01:00").unwrap();
            let b = parse_instant("2024-01-10T10:00:00Z").unwrap();
            assert_eq!(to_unix_seconds(&a), to_unix_seconds(&b));
        }

        #[test]
        fn unix_seconds_floor_sub_second() {
            let dt = parse_instant("2024-01-10T10:00:00.999Z").unwrap();
            assert_eq!(to_unix_seconds(&dt), 1_704_880_800);
        }

        #[test]
        fn display_uses_instant_zone() {
            let dt = parse_instant("2024-01-10T09:05:00+02:00").unwrap();
            assert_eq!(display_hhmm(&dt), "09:05");
            assert_eq!(display_hhmm(&dt.with_timezone(&Utc)), "07:05");
        }

        #[test]
        fn display_in_named_zone() {
            let tz = resolve_timezone("Europe/Berlin").unwrap();
            let dt = utc(2024, 7, 1, 22, 30, 0).with_timezone(&tz);
            assert_eq!(display_hhmm(&dt), "00:30");
        }
    }
}
