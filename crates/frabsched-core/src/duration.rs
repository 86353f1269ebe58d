//! Session duration parsing.
//!
//! Frab-style schedules declare the length of a session as colon-separated
//! integers: `H:M` for most talks and `D:H:M` for multi-day sessions.

use chrono::Duration;
use thiserror::Error;

/// Errors produced while parsing a duration string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// The string did not have two or three colon-separated parts.
    #[error("invalid duration {value:?}: expected H:M or D:H:M")]
    PartCount { value: String },

    /// One of the parts is not an integer.
    #[error("invalid duration {value:?}: {part:?} is not an integer")]
    InvalidPart { value: String, part: String },

    /// The parts add up to more than a duration can hold.
    #[error("invalid duration {value:?}: out of range")]
    OutOfRange { value: String },
}

impl DurationError {
    /// Returns the duration string that failed to parse.
    pub fn value(&self) -> &str {
        match self {
            Self::PartCount { value }
            | Self::InvalidPart { value, .. }
            | Self::OutOfRange { value } => value,
        }
    }
}

/// Parses a `H:M` or `D:H:M` duration string.
///
/// Each part may carry surrounding whitespace. Negative parts are accepted
/// and yield a shorter (possibly negative) duration; they are not rejected.
///
/// # Errors
///
/// Returns [`DurationError::PartCount`] when the string does not have exactly
/// two or three parts, and [`DurationError::InvalidPart`] when a part is not
/// an integer.
pub fn parse_duration(value: &str) -> Result<Duration, DurationError> {
    let parts = value
        .split(':')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| DurationError::InvalidPart {
                    value: value.to_string(),
                    part: part.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>();

    // Part count is checked first so "1:2:3:4x" reports the shape, not the digit.
    let part_count = value.split(':').count();
    if part_count != 2 && part_count != 3 {
        return Err(DurationError::PartCount {
            value: value.to_string(),
        });
    }

    let (days, hours, minutes) = match parts?.as_slice() {
        [d, h, m] => (*d, *h, *m),
        [h, m] => (0, *h, *m),
        _ => {
            return Err(DurationError::PartCount {
                value: value.to_string(),
            });
        }
    };

    let out_of_range = || DurationError::OutOfRange {
        value: value.to_string(),
    };

    Duration::try_days(days)
        .zip(Duration::try_hours(hours))
        .zip(Duration::try_minutes(minutes))
        .and_then(|((d, h), m)| d.checked_add(&h)?.checked_add(&m))
        .ok_or_else(out_of_range)
}
