//! Log subscriber setup.
//!
//! Everything is written to stderr; stdout is reserved for schedule output,
//! which may be JSON piped into another tool.
//!
//! `RUST_LOG` takes precedence over the configured level. Without it only
//! the `frabsched*` crates log, so reqwest and friends stay silent.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Prefix shared by the targets of every crate in the workspace.
const TARGET_PREFIX: &str = "frabsched";

/// Subscriber installation failed.
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("a global log subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("invalid log directive: {0}")]
    Directive(#[from] tracing_subscriber::filter::ParseError),
}

/// How log lines are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per record, no timestamps.
    #[default]
    Compact,
    /// Indented multi-line records.
    Pretty,
    /// Newline-delimited JSON.
    Json,
}

/// Settings for [`init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub level: Level,
    pub format: LogFormat,
    /// Print file and line of each record.
    pub show_source: bool,
    /// Print the module path of each record.
    pub show_target: bool,
    /// Explicit filter directives, replacing both `RUST_LOG` and `level`.
    pub directives: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            show_source: false,
            show_target: false,
            directives: None,
        }
    }
}

impl TracingConfig {
    /// Settings for the `frabsched` binary. `--debug` switches to debug
    /// level with source locations.
    #[must_use]
    pub fn cli(debug: bool) -> Self {
        if !debug {
            return Self::default();
        }
        Self {
            level: Level::DEBUG,
            show_source: true,
            show_target: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    fn fallback_directive(&self) -> String {
        format!("{TARGET_PREFIX}={}", self.level)
    }

    fn filter(&self) -> Result<EnvFilter, TracingError> {
        if let Some(ref directives) = self.directives {
            return Ok(EnvFilter::try_new(directives)?);
        }
        Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.fallback_directive())))
    }
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Fails when a subscriber is already installed or the configured
/// directives do not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.filter()?;

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.show_target)
        .with_file(config.show_source)
        .with_line_number(config.show_source);

    let output = match config.format {
        LogFormat::Compact => base.compact().without_time().boxed(),
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Json => base.json().boxed(),
    };

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(filter).with(output),
    )?;
    Ok(())
}
