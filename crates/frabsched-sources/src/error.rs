//! Error types for schedule imports.
//!
//! Every failure aborts the whole import: a schedule either normalizes
//! completely or yields no records at all.

use std::fmt;

use frabsched_core::{DurationError, TimezoneError};
use thiserror::Error;

/// The category of a schedule error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleErrorCode {
    /// Fetching the document failed (network failure or non-success status).
    Transport,
    /// The document does not have the expected tree/array shape.
    MalformedSchedule,
    /// A duration string is not `H:M` or `D:H:M`.
    InvalidDuration,
    /// An event lacks its unique identifier.
    MissingIdentifier,
    /// The requested target timezone is unknown.
    UnknownTimezone,
}

impl ScheduleErrorCode {
    /// Returns a stable machine-readable name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport_error",
            Self::MalformedSchedule => "malformed_schedule",
            Self::InvalidDuration => "invalid_duration",
            Self::MissingIdentifier => "missing_identifier",
            Self::UnknownTimezone => "unknown_timezone",
        }
    }
}

impl fmt::Display for ScheduleErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error raised while fetching or normalizing a schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The transport could not deliver the document.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        /// HTTP status, when the server answered at all.
        status: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The document could not be read as a schedule.
    #[error("malformed schedule: {message}")]
    MalformedSchedule { message: String },

    /// An event declares an unparseable duration.
    #[error(transparent)]
    InvalidDuration(#[from] DurationError),

    /// An event has no identifier.
    #[error("event #{position} has no identifier")]
    MissingIdentifier {
        /// Zero-based position of the event in document order.
        position: usize,
    },

    /// The target timezone is not a known IANA name.
    #[error(transparent)]
    UnknownTimezone(#[from] TimezoneError),
}

impl ScheduleError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates a transport error for a non-success HTTP status.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    /// Creates a malformed schedule error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSchedule {
            message: message.into(),
        }
    }

    /// Creates a missing identifier error for the event at `position`.
    pub fn missing_identifier(position: usize) -> Self {
        Self::MissingIdentifier { position }
    }

    /// Attaches an underlying cause to a transport error.
    ///
    /// Other variants are returned unchanged.
    pub fn with_source<E>(self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            Self::Transport {
                message, status, ..
            } => Self::Transport {
                message,
                status,
                source: Some(Box::new(cause)),
            },
            other => other,
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> ScheduleErrorCode {
        match self {
            Self::Transport { .. } => ScheduleErrorCode::Transport,
            Self::MalformedSchedule { .. } => ScheduleErrorCode::MalformedSchedule,
            Self::InvalidDuration(_) => ScheduleErrorCode::InvalidDuration,
            Self::MissingIdentifier { .. } => ScheduleErrorCode::MissingIdentifier,
            Self::UnknownTimezone(_) => ScheduleErrorCode::UnknownTimezone,
        }
    }

    /// Returns the HTTP status of a transport error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

/// A specialized Result type for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
