//! Schedule transports and the XML/JSON schedule parsers.
//!
//! # Architecture
//!
//! ```text
//!            source identifier
//!                   │
//!                   ▼  SourceFormat::from_identifier (".json" suffix?)
//!                   │
//!                   ▼  Transport::fetch (exactly once)
//!          ┌────────────────┐
//!          │ ScheduleSource │── Json { timezone } resolved here
//!          └───────┬────────┘
//!        ┌─────────┴─────────┐
//!        ▼                   ▼
//! parse_xml_schedule   parse_json_schedule
//!        │                   │
//!        └─────────┬─────────┘
//!                  ▼
//!          Vec<ScheduleEvent>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use frabsched_sources::{FetchConfig, HttpTransport, get_schedule};
//!
//! let transport = HttpTransport::new(&FetchConfig::default())?;
//! let events = get_schedule(
//!     &transport,
//!     "https://warwickhack.co.uk/schedule.json",
//!     "warwick",
//!     Some("Europe/London"),
//! )?;
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod json;
pub mod transport;
pub mod xml;

pub use config::FetchConfig;
pub use dispatch::{DEFAULT_TIMEZONE, ScheduleImporter, ScheduleSource, SourceFormat, get_schedule};
pub use error::{ScheduleError, ScheduleErrorCode, ScheduleResult};
pub use json::parse_json_schedule;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{AutoTransport, FileTransport, Transport};
pub use xml::{XmlElement, parse_document, parse_xml_schedule};
