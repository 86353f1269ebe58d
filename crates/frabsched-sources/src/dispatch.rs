//! Format dispatch: picks the parser for a schedule source and runs the
//! fetch-then-parse pipeline.

use chrono_tz::Tz;
use frabsched_core::{ScheduleEvent, resolve_timezone};
use tracing::{debug, info_span};

use crate::error::ScheduleResult;
use crate::json::parse_json_schedule;
use crate::transport::Transport;
use crate::xml::parse_xml_schedule;

/// Timezone used when the caller does not name one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Wire format of a schedule, decided from its identifier alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Frab-style `day → room → event` XML.
    Xml,
    /// Flat JSON array of events.
    Json,
}

impl SourceFormat {
    /// Classifies a source identifier.
    ///
    /// Identifiers ending in `.json` are JSON; everything else is XML. The
    /// check is a case-sensitive suffix match and never looks at content.
    pub fn from_identifier(identifier: &str) -> Self {
        if identifier.ends_with(".json") {
            Self::Json
        } else {
            Self::Xml
        }
    }

    /// Returns a short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }
}

/// A classified source together with the parameters its parser needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSource {
    /// XML schedules display times in each event's declared offset and so
    /// take no timezone.
    Xml,
    /// JSON schedules are converted into `timezone`.
    Json { timezone: Tz },
}

impl ScheduleSource {
    /// Classifies `identifier` and, for JSON, resolves `timezone`
    /// (defaulting to UTC).
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::UnknownTimezone`](crate::ScheduleError::UnknownTimezone)
    /// for a JSON source with an unknown timezone name. XML sources ignore
    /// the timezone entirely and never fail here.
    pub fn classify(identifier: &str, timezone: Option<&str>) -> ScheduleResult<Self> {
        match SourceFormat::from_identifier(identifier) {
            SourceFormat::Xml => {
                if let Some(tz) = timezone.filter(|tz| *tz != DEFAULT_TIMEZONE) {
                    debug!(timezone = %tz, "XML schedules use each event's own offset, ignoring timezone");
                }
                Ok(Self::Xml)
            }
            SourceFormat::Json => {
                let timezone = resolve_timezone(timezone.unwrap_or(DEFAULT_TIMEZONE))?;
                Ok(Self::Json { timezone })
            }
        }
    }

    /// Returns the wire format.
    pub fn format(&self) -> SourceFormat {
        match self {
            Self::Xml => SourceFormat::Xml,
            Self::Json { .. } => SourceFormat::Json,
        }
    }

    /// Parses a fetched document with the matching parser.
    pub fn parse(&self, document: &[u8], group: &str) -> ScheduleResult<Vec<ScheduleEvent>> {
        match *self {
            Self::Xml => parse_xml_schedule(document, group),
            Self::Json { timezone } => parse_json_schedule(document, group, timezone),
        }
    }
}

/// Fetches a schedule and normalizes it.
///
/// The format is picked from the `.json` suffix, the document is fetched
/// exactly once, and only then is the source classified: a JSON source's
/// timezone is resolved after the fetch so a failing transport always
/// reports as such.
///
/// # Errors
///
/// Any error aborts the call with no records. Transport failures surface
/// first, then an unknown JSON timezone, then parse failures as the parser
/// reports them.
pub fn get_schedule<T: Transport>(
    transport: &T,
    url: &str,
    group: &str,
    timezone: Option<&str>,
) -> ScheduleResult<Vec<ScheduleEvent>> {
    let format = SourceFormat::from_identifier(url);
    let span = info_span!("get_schedule", url = %url, group = %group, format = format.as_str());
    let _enter = span.enter();

    let document = transport.fetch(url)?;
    debug!(bytes = document.len(), "fetched document");

    ScheduleSource::classify(url, timezone)?.parse(&document, group)
}

/// Imports schedules through a fixed transport.
#[derive(Debug, Clone)]
pub struct ScheduleImporter<T> {
    transport: T,
}

impl<T: Transport> ScheduleImporter<T> {
    /// Creates an importer on top of `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Imports `url` with the default (UTC) timezone.
    pub fn get_schedule(&self, url: &str, group: &str) -> ScheduleResult<Vec<ScheduleEvent>> {
        get_schedule(&self.transport, url, group, None)
    }

    /// Imports `url`, converting JSON schedules into `timezone`.
    pub fn get_schedule_with_timezone(
        &self,
        url: &str,
        group: &str,
        timezone: &str,
    ) -> ScheduleResult<Vec<ScheduleEvent>> {
        get_schedule(&self.transport, url, group, Some(timezone))
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
