//! CLI error types.

use frabsched_sources::ScheduleError;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file or flag problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Fetching or normalizing a schedule failed.
    #[error("{0}")]
    Schedule(#[from] ScheduleError),

    /// Rendering JSON output failed.
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
