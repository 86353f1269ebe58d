//! Transports that retrieve raw schedule documents.
//!
//! The parsers never perform I/O themselves; a [`Transport`] hands them the
//! document body. Each import calls [`Transport::fetch`] exactly once.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use url::Url;

use crate::error::{ScheduleError, ScheduleResult};

#[cfg(feature = "http")]
use crate::config::FetchConfig;

/// Retrieves the raw bytes of a schedule document.
pub trait Transport {
    /// Fetches the document identified by `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Transport`] when the document cannot be
    /// retrieved, including non-success HTTP statuses.
    fn fetch(&self, url: &str) -> ScheduleResult<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn fetch(&self, url: &str) -> ScheduleResult<Vec<u8>> {
        (**self).fetch(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn fetch(&self, url: &str) -> ScheduleResult<Vec<u8>> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP(S) transport.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Creates a transport with the given configuration.
    pub fn new(config: &FetchConfig) -> ScheduleResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ScheduleError::transport(format!("failed to create HTTP client: {e}"))
                    .with_source(e)
            })?;

        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> ScheduleResult<Vec<u8>> {
        trace!(url = %url, "sending request");

        let response = self.client.get(url).send().map_err(|e| {
            ScheduleError::transport(format!("GET {url} failed: {e}")).with_source(e)
        })?;

        let status = response.status();
        trace!(status = %status, "received response");

        if !status.is_success() {
            return Err(ScheduleError::status(
                status.as_u16(),
                format!("GET {url} returned {status}"),
            ));
        }

        let body = response.bytes().map_err(|e| {
            ScheduleError::transport(format!("failed to read response from {url}: {e}"))
                .with_source(e)
        })?;
        debug!(url = %url, bytes = body.len(), "fetched schedule");

        Ok(body.to_vec())
    }
}

/// Reads schedules from the local filesystem.
///
/// Accepts plain paths as well as `file://` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransport;

impl FileTransport {
    /// Maps a `file://` URL or a plain path to a filesystem path.
    fn resolve(location: &str) -> ScheduleResult<PathBuf> {
        if location.starts_with("file:") {
            let url = Url::parse(location).map_err(|e| {
                ScheduleError::transport(format!("invalid file URL {location}: {e}")).with_source(e)
            })?;
            return url
                .to_file_path()
                .map_err(|()| ScheduleError::transport(format!("not a local file URL: {location}")));
        }
        Ok(Path::new(location).to_path_buf())
    }
}

impl Transport for FileTransport {
    fn fetch(&self, url: &str) -> ScheduleResult<Vec<u8>> {
        let path = Self::resolve(url)?;
        let body = std::fs::read(&path).map_err(|e| {
            ScheduleError::transport(format!("failed to read {}: {e}", path.display()))
                .with_source(e)
        })?;
        debug!(path = %path.display(), bytes = body.len(), "read schedule");
        Ok(body)
    }
}

/// Routes `http://`/`https://` locations to HTTP and everything else to
/// the filesystem.
#[derive(Debug, Clone)]
pub struct AutoTransport {
    #[cfg(feature = "http")]
    http: HttpTransport,
    file: FileTransport,
}

impl AutoTransport {
    /// Creates the transport pair.
    #[cfg(feature = "http")]
    pub fn new(config: &FetchConfig) -> ScheduleResult<Self> {
        Ok(Self {
            http: HttpTransport::new(config)?,
            file: FileTransport,
        })
    }

    /// Creates a filesystem-only transport.
    #[cfg(not(feature = "http"))]
    pub fn new() -> ScheduleResult<Self> {
        Ok(Self { file: FileTransport })
    }

    /// Returns true if `location` is fetched over the network.
    pub fn is_remote(location: &str) -> bool {
        let lower = location.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

impl Transport for AutoTransport {
    fn fetch(&self, url: &str) -> ScheduleResult<Vec<u8>> {
        if Self::is_remote(url) {
            #[cfg(feature = "http")]
            return self.http.fetch(url);
            #[cfg(not(feature = "http"))]
            return Err(ScheduleError::transport(format!(
                "HTTP support is disabled, cannot fetch {url}"
            )));
        }
        self.file.fetch(url)
    }
}
