//! Core types: schedule events, durations, time normalization, field access

pub mod duration;
pub mod event;
pub mod fields;
pub mod time;
pub mod tracing;

pub use duration::{parse_duration, DurationError};
pub use event::ScheduleEvent;
pub use fields::FieldSource;
pub use time::{
    display_hhmm, parse_instant, resolve_timezone, to_unix_seconds, TimestampError, TimezoneError,
};
pub use crate::tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
