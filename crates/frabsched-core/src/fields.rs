//! Field access on semi-structured schedule nodes.

use serde_json::{Map, Value};

/// A node (XML element, JSON object) that exposes named textual fields.
///
/// Every optional text field of a [`ScheduleEvent`](crate::ScheduleEvent)
/// is read through [`FieldSource::text_or_empty`], so a record never holds a
/// missing value, only present-or-empty strings.
pub trait FieldSource {
    /// Returns the text stored under `key`, or `None` when the key is absent
    /// or its value is null.
    ///
    /// The text is returned as stored: no trimming, no coercion beyond
    /// converting the value to a string.
    fn field_text(&self, key: &str) -> Option<String>;

    /// Returns the text stored under `key`, or an empty string.
    fn text_or_empty(&self, key: &str) -> String {
        self.field_text(key).unwrap_or_default()
    }
}

impl FieldSource for Map<String, Value> {
    fn field_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn present_string_is_returned_verbatim() {
        let node = object(json!({ "title": "  Opening Keynote " }));
        assert_eq!(node.text_or_empty("title"), "  Opening Keynote ");
    }

    #[test]
    fn missing_key_is_empty() {
        let node = object(json!({ "title": "Keynote" }));
        assert_eq!(node.text_or_empty("location"), "");
        assert_eq!(node.field_text("location"), None);
    }

    #[test]
    fn null_is_empty() {
        let node = object(json!({ "description": null }));
        assert_eq!(node.text_or_empty("description"), "");
    }

    #[test]
    fn empty_string_stays_empty() {
        let node = object(json!({ "type": "" }));
        assert_eq!(node.text_or_empty("type"), "");
    }

    #[test]
    fn scalars_are_rendered_as_text() {
        let node = object(json!({ "location": 101, "type": true }));
        assert_eq!(node.text_or_empty("location"), "101");
        assert_eq!(node.text_or_empty("type"), "true");
    }
}
