//! Fetch configuration for the HTTP transport.

use std::time::Duration;

/// Settings applied to every schedule fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Reject servers with invalid certificates.
    pub verify_tls: bool,

    /// Upper bound on a whole request, body included.
    pub timeout: Duration,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl FetchConfig {
    /// Seconds allowed per request unless configured otherwise.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self {
            verify_tls: true,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: Self::default_user_agent(),
        }
    }

    /// The user agent sent when none is configured.
    pub fn default_user_agent() -> String {
        format!("frabsched/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Accepts self-signed or expired certificates.
    pub fn with_insecure_tls(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new()
    }
}
