//! Rendering of normalized records for the terminal.

use frabsched_core::ScheduleEvent;

/// How records are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per event, grouped under a header per group.
    #[default]
    Text,
    /// Pretty-printed JSON array of records.
    Json,
}

impl OutputFormat {
    /// Renders events in this format.
    pub fn render(&self, events: &[ScheduleEvent]) -> serde_json::Result<String> {
        match self {
            Self::Text => Ok(render_text(events)),
            Self::Json => render_json(events),
        }
    }
}

/// Renders events as a pretty JSON array.
pub fn render_json(events: &[ScheduleEvent]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(events)
}

/// Renders events as a text listing.
///
/// Groups appear in the order they are first seen; events keep their
/// order within a group:
///
/// ```text
/// camp
///   10:00-11:30 [Saal 1] Opening (Ada, Grace)
///   12:00-12:30 Lunch
/// ```
pub fn render_text(events: &[ScheduleEvent]) -> String {
    let mut groups: Vec<(&str, Vec<&ScheduleEvent>)> = Vec::new();
    for event in events {
        match groups.iter_mut().find(|(group, _)| *group == event.group) {
            Some((_, members)) => members.push(event),
            None => groups.push((event.group.as_str(), vec![event])),
        }
    }

    let mut lines = Vec::with_capacity(events.len() + groups.len());
    for (group, members) in groups {
        lines.push(group.to_string());
        lines.extend(members.into_iter().map(|event| format!("  {}", event_line(event))));
    }
    lines.join("\n")
}

fn event_line(event: &ScheduleEvent) -> String {
    let mut line = format!("{}-{}", event.start_str, event.end_str);
    if !event.place.is_empty() {
        line.push_str(&format!(" [{}]", event.place));
    }
    line.push(' ');
    line.push_str(&event.title);
    if !event.speakers.is_empty() {
        line.push_str(&format!(" ({})", event.speaker_line()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(id: &str, group: &str, hour: u32, minutes: i64) -> ScheduleEvent {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, hour, 0, 0).unwrap();
        let end = start + chrono::Duration::minutes(minutes);
        ScheduleEvent::new(id, group, &start, &end)
    }

    fn sample() -> Vec<ScheduleEvent> {
        vec![
            event("1", "camp", 10, 90)
                .with_title("Opening")
                .with_place("Saal 1")
                .with_speakers(vec!["Ada".to_string(), "Grace".to_string()]),
            event("h1", "hack", 9, 60).with_title("Hacking begins"),
            event("2", "camp", 12, 30).with_title("Lunch"),
        ]
    }

    #[test]
    fn text_listing() {
        insta::assert_snapshot!(render_text(&sample()), @r"
        camp
          10:00-11:30 [Saal 1] Opening (Ada, Grace)
          12:00-12:30 Lunch
        hack
          09:00-10:00 Hacking begins
        ");
    }

    #[test]
    fn text_listing_empty() {
        assert_eq!(render_text(&[]), "");
    }

    #[test]
    fn json_listing_keeps_order() {
        let rendered = render_json(&sample()).unwrap();
        let back: Vec<ScheduleEvent> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn format_dispatch() {
        let events = sample();
        assert_eq!(
            OutputFormat::Text.render(&events).unwrap(),
            render_text(&events)
        );
        assert!(OutputFormat::Json.render(&events).unwrap().starts_with('['));
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
