//! Flat JSON schedule parsing.
//!
//! The document is an array of event objects:
//!
//! ```json
//! [{"uuid": "...", "start": "2024-01-10T10:00:00Z", "end": "2024-01-10T11:00:00Z",
//!   "title": "...", "type": "...", "location": "...", "description": "..."}]
//! ```
//!
//! Times are UTC unless they carry an offset, and are converted into the
//! caller's target timezone before anything is derived from them.

use chrono_tz::Tz;
use frabsched_core::{FieldSource, ScheduleEvent, parse_instant};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{ScheduleError, ScheduleResult};

/// Parses a JSON schedule into normalized events.
///
/// Events keep array order. `start_str`/`end_str` are wall-clock times in
/// `timezone`. The duration is `end - start` as declared by the source and
/// may be zero or negative. Records carry no speakers and no language.
///
/// # Errors
///
/// Fails on the first problem and returns no events at all:
/// - [`ScheduleError::MalformedSchedule`] when the document is not an array
///   of objects, or an event lacks a parseable `start`/`end`
/// - [`ScheduleError::MissingIdentifier`] for an event without `uuid`
pub fn parse_json_schedule(
    document: &[u8],
    group: &str,
    timezone: Tz,
) -> ScheduleResult<Vec<ScheduleEvent>> {
    let value: Value = serde_json::from_slice(document)
        .map_err(|e| ScheduleError::malformed(format!("invalid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(ScheduleError::malformed(
            "expected a JSON array of events",
        ));
    };

    let events = items
        .iter()
        .enumerate()
        .map(|(position, item)| match item {
            Value::Object(object) => parse_event(object, position, group, timezone),
            _ => Err(ScheduleError::malformed(format!(
                "event #{position} is not an object"
            ))),
        })
        .collect::<ScheduleResult<Vec<_>>>()?;

    debug!(group = %group, timezone = %timezone, count = events.len(), "parsed JSON schedule");
    Ok(events)
}

fn parse_event(
    object: &Map<String, Value>,
    position: usize,
    group: &str,
    timezone: Tz,
) -> ScheduleResult<ScheduleEvent> {
    let start = instant(object, "start", position)?.with_timezone(&timezone);
    let end = instant(object, "end", position)?.with_timezone(&timezone);

    let id = object
        .field_text("uuid")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ScheduleError::missing_identifier(position))?;

    trace!(id = %id, start = %start, "parsed event");

    Ok(ScheduleEvent::new(id, group, &start, &end)
        .with_title(object.text_or_empty("title"))
        .with_track(object.text_or_empty("type"))
        .with_place(object.text_or_empty("location"))
        .with_abstract(object.text_or_empty("description")))
}

fn instant(
    object: &Map<String, Value>,
    key: &str,
    position: usize,
) -> ScheduleResult<chrono::DateTime<chrono::FixedOffset>> {
    let text = match object.get(key) {
        Some(Value::String(text)) => text,
        Some(_) => {
            return Err(ScheduleError::malformed(format!(
                "event #{position}: {key:?} is not a string"
            )));
        }
        None => {
            return Err(ScheduleError::malformed(format!(
                "event #{position} has no {key:?}"
            )));
        }
    };
    parse_instant(text).map_err(|e| ScheduleError::malformed(format!("event #{position}: {e}")))
}
