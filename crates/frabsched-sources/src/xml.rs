//! Frab-style XML schedule parsing.
//!
//! The document is a `schedule → day → room → event` tree:
//!
//! ```text
//! <schedule><day><room><event id="...">
//!   <date>2024-01-10T10:00:00+01:00</date><duration>00:30</duration>
//!   <title/><track/><room/><abstract/><language/>
//!   <persons><person>Name</person></persons>
//! </event></room></day></schedule>
//! ```
//!
//! The reader never resolves DTDs or external entities. Only the predefined
//! XML entities and character references are expanded; a DOCTYPE that
//! declares entities is rejected outright.

use frabsched_core::{FieldSource, ScheduleEvent, parse_duration, parse_instant};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, trace};

use crate::error::{ScheduleError, ScheduleResult};

/// An element of a parsed XML document.
///
/// Names are stored without namespace prefix. `text` is the character data
/// that precedes the first child element; text following a child is not
/// kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Returns the local element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the attribute `key`, if present.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the element's leading text, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the first direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns all direct children named `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn from_start(start: &BytesStart<'_>) -> ScheduleResult<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| {
                ScheduleError::malformed(format!("invalid attribute on <{name}>: {e}"))
            })?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| ScheduleError::malformed(format!("invalid attribute {key:?}: {e}")))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            text: None,
            children: Vec::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        // Character data after the first child is tail text, not ours.
        if self.children.is_empty() {
            self.text.get_or_insert_with(String::new).push_str(text);
        }
    }
}

impl FieldSource for XmlElement {
    fn field_text(&self, key: &str) -> Option<String> {
        self.child(key)?.text().map(str::to_string)
    }
}

/// Parses an XML document into its root element.
///
/// # Errors
///
/// Returns [`ScheduleError::MalformedSchedule`] for invalid UTF-8, syntax
/// errors, mismatched or unclosed tags, entity declarations, unknown entity
/// references, content outside the root element, or a missing root.
pub fn parse_document(document: &[u8]) -> ScheduleResult<XmlElement> {
    let text = std::str::from_utf8(document)
        .map_err(|e| ScheduleError::malformed(format!("document is not valid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ScheduleError::malformed(format!("at byte {}: {e}", reader.error_position()))
        })?;

        match event {
            Event::Start(start) => {
                ensure_single_root(&stack, &root)?;
                stack.push(XmlElement::from_start(&start)?);
            }
            Event::Empty(start) => {
                ensure_single_root(&stack, &root)?;
                let element = XmlElement::from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                // quick-xml has already checked that the end tag matches.
                let element = stack
                    .pop()
                    .ok_or_else(|| ScheduleError::malformed("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ScheduleError::malformed(format!("invalid text: {e}")))?;
                match stack.last_mut() {
                    Some(element) => element.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(ScheduleError::malformed(
                            "text outside of the root element",
                        ));
                    }
                }
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(&cdata)
                    .map_err(|e| ScheduleError::malformed(format!("invalid CDATA: {e}")))?;
                match stack.last_mut() {
                    Some(element) => element.push_text(text),
                    None => {
                        return Err(ScheduleError::malformed(
                            "CDATA outside of the root element",
                        ));
                    }
                }
            }
            Event::DocType(doctype) => {
                let declaration = String::from_utf8_lossy(&doctype);
                if declaration.contains("<!ENTITY") {
                    return Err(ScheduleError::malformed(
                        "entity declarations are not allowed",
                    ));
                }
                trace!("ignoring document type declaration");
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ScheduleError::malformed(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| ScheduleError::malformed("document has no root element"))
}

fn ensure_single_root(stack: &[XmlElement], root: &Option<XmlElement>) -> ScheduleResult<()> {
    if stack.is_empty() && root.is_some() {
        return Err(ScheduleError::malformed(
            "content after the root element",
        ));
    }
    Ok(())
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// Parses a Frab-style XML schedule into normalized events.
///
/// Events are returned in document order (day, then room, then event).
/// Start and end display strings use the offset declared in each event's
/// `date`; only the Unix timestamps are converted to UTC.
///
/// # Errors
///
/// Fails on the first problem and returns no events at all:
/// - [`ScheduleError::MalformedSchedule`] for an unreadable document or an
///   event without a usable `date` or `duration` element
/// - [`ScheduleError::InvalidDuration`] for a duration that is not `H:M`
///   or `D:H:M`
/// - [`ScheduleError::MissingIdentifier`] for an event without `id`
pub fn parse_xml_schedule(document: &[u8], group: &str) -> ScheduleResult<Vec<ScheduleEvent>> {
    let root = parse_document(document)?;

    let events = root
        .children_named("day")
        .flat_map(|day| day.children_named("room"))
        .flat_map(|room| room.children_named("event"))
        .enumerate()
        .map(|(position, node)| parse_event(node, position, group))
        .collect::<ScheduleResult<Vec<_>>>()?;

    debug!(group = %group, count = events.len(), "parsed XML schedule");
    Ok(events)
}

fn parse_event(node: &XmlElement, position: usize, group: &str) -> ScheduleResult<ScheduleEvent> {
    let date = node
        .field_text("date")
        .ok_or_else(|| ScheduleError::malformed(format!("event #{position} has no date")))?;
    let start = parse_instant(&date)
        .map_err(|e| ScheduleError::malformed(format!("event #{position}: {e}")))?;

    let duration = node
        .field_text("duration")
        .ok_or_else(|| ScheduleError::malformed(format!("event #{position} has no duration")))?;
    let duration = parse_duration(&duration)?;

    let end = start.checked_add_signed(duration).ok_or_else(|| {
        ScheduleError::malformed(format!("event #{position}: end time out of range"))
    })?;

    let speakers = node
        .child("persons")
        .map(|persons| {
            persons
                .children_named("person")
                .map(|person| person.text().unwrap_or_default().trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let id = node
        .attribute("id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ScheduleError::missing_identifier(position))?;

    trace!(id = %id, start = %start, "parsed event");

    Ok(ScheduleEvent::new(id, group, &start, &end)
        .with_title(node.text_or_empty("title"))
        .with_track(node.text_or_empty("track"))
        .with_place(node.text_or_empty("room"))
        .with_abstract(node.text_or_empty("abstract"))
        .with_lang(node.text_or_empty("language"))
        .with_speakers(speakers))
}
