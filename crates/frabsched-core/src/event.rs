//! The canonical schedule event record.
//!
//! Both the XML and the JSON schedule formats normalize into
//! [`ScheduleEvent`]. Records are plain values: they are built once per
//! import and never mutated afterwards by this crate.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::time::{display_hhmm, to_unix_seconds};

/// A normalized schedule event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    /// Source-provided identifier (XML `id` attribute or JSON `uuid`).
    pub id: String,
    /// Caller-supplied label of the feed this event came from.
    pub group: String,
    /// Session title.
    pub title: String,
    /// Track or session type.
    pub track: String,
    /// Room or location.
    pub place: String,
    /// Session abstract.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Session language. Only XML schedules carry it; JSON records leave it
    /// out entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Speaker display names, in source order.
    #[serde(default)]
    pub speakers: Vec<String>,
    /// Start, in seconds since the Unix epoch (UTC).
    pub start_unix: i64,
    /// End, in seconds since the Unix epoch (UTC).
    pub end_unix: i64,
    /// Length in whole minutes.
    pub duration: i64,
    /// Wall-clock start (`HH:MM`) in the zone used while parsing.
    pub start_str: String,
    /// Wall-clock end (`HH:MM`) in the zone used while parsing.
    pub end_str: String,
}

impl ScheduleEvent {
    /// Creates an event spanning `start..end`.
    ///
    /// The Unix timestamps are computed in UTC while `start_str`/`end_str`
    /// keep the wall-clock time of whatever zone the instants are expressed
    /// in. `duration` is the span in whole seconds divided by 60, truncated
    /// toward zero; a span where `end` precedes `start` is kept as is.
    pub fn new<Z: TimeZone>(
        id: impl Into<String>,
        group: impl Into<String>,
        start: &DateTime<Z>,
        end: &DateTime<Z>,
    ) -> Self
    where
        Z::Offset: std::fmt::Display,
    {
        let span = end.clone().signed_duration_since(start.clone());
        Self {
            id: id.into(),
            group: group.into(),
            title: String::new(),
            track: String::new(),
            place: String::new(),
            abstract_text: String::new(),
            lang: None,
            speakers: Vec::new(),
            start_unix: to_unix_seconds(start),
            end_unix: to_unix_seconds(end),
            duration: span.num_seconds() / 60,
            start_str: display_hhmm(start),
            end_str: display_hhmm(end),
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the track.
    pub fn with_track(mut self, track: impl Into<String>) -> Self {
        self.track = track.into();
        self
    }

    /// Sets the place.
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = place.into();
        self
    }

    /// Sets the abstract.
    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = abstract_text.into();
        self
    }

    /// Sets the language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Sets the speakers.
    pub fn with_speakers(mut self, speakers: Vec<String>) -> Self {
        self.speakers = speakers;
        self
    }

    /// Returns the `(group, id)` pair that identifies this record.
    pub fn key(&self) -> (&str, &str) {
        (&self.group, &self.id)
    }

    /// Returns the speakers joined for display, e.g. `"Ada, Grace"`.
    pub fn speaker_line(&self) -> String {
        self.speakers.join(", ")
    }
}
