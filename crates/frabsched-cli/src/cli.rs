//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use frabsched_core::{LogFormat, TracingConfig};

use crate::output::OutputFormat;

/// frabsched - Frab conference schedules, normalized
#[derive(Debug, Parser)]
#[command(name = "frabsched")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "FRABSCHED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Output records as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Layout of log lines on stderr
    #[arg(long, value_enum, default_value_t = LogStyle::Compact)]
    pub log_format: LogStyle,

    /// Log filter directives, e.g. "frabsched_sources=trace" (overrides RUST_LOG)
    #[arg(long)]
    pub log_filter: Option<String>,

    // --- Source selection ---
    /// Schedule URL or file path; ".json" suffix selects the JSON format
    #[arg(conflicts_with = "feed")]
    pub source: Option<String>,

    /// Fetch a single named feed from the configuration file
    #[arg(long)]
    pub feed: Option<String>,

    /// Group label stamped on every record of SOURCE
    #[arg(long, short, default_value = "default")]
    pub group: String,

    /// Target timezone for JSON schedules (IANA name, default UTC)
    #[arg(long, short = 't')]
    pub timezone: Option<String>,

    // --- Connection flags ---
    /// Request timeout in seconds (overrides the config file)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the output format based on CLI flags.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Log settings from the flags; `config_debug` comes from the config file.
    pub fn tracing_config(&self, config_debug: bool) -> TracingConfig {
        let config = TracingConfig::cli(self.debug || config_debug).format(self.log_format.into());
        match self.log_filter {
            Some(ref directives) => config.directives(directives.as_str()),
            None => config,
        }
    }
}

/// Values accepted by `--log-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogStyle {
    Compact,
    Pretty,
    Json,
}

impl From<LogStyle> for LogFormat {
    fn from(style: LogStyle) -> Self {
        match style {
            LogStyle::Compact => LogFormat::Compact,
            LogStyle::Pretty => LogFormat::Pretty,
            LogStyle::Json => LogFormat::Json,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the current configuration
    Dump,
    /// Validate the configuration
    Validate,
    /// Show the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn source_with_defaults() {
        let cli = Cli::parse_from(["frabsched", "https://example.org/schedule.xml"]);
        assert_eq!(cli.source.as_deref(), Some("https://example.org/schedule.xml"));
        assert_eq!(cli.group, "default");
        assert!(cli.timezone.is_none());
        assert_eq!(cli.output_format(), OutputFormat::Text);
        assert!(cli.command.is_none());
    }

    #[test]
    fn json_source_with_timezone() {
        let cli = Cli::parse_from([
            "frabsched",
            "--json",
            "--group",
            "warwick",
            "--timezone",
            "Europe/London",
            "schedule.json",
        ]);
        assert_eq!(cli.group, "warwick");
        assert_eq!(cli.timezone.as_deref(), Some("Europe/London"));
        assert_eq!(cli.output_format(), OutputFormat::Json);
    }

    #[test]
    fn feed_conflicts_with_source() {
        let result = Cli::try_parse_from(["frabsched", "--feed", "camp", "schedule.xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn log_flags_reach_tracing_config() {
        let cli = Cli::parse_from([
            "frabsched",
            "--log-format",
            "json",
            "--log-filter",
            "frabsched_sources=trace",
            "schedule.xml",
        ]);
        let config = cli.tracing_config(false);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.directives.as_deref(), Some("frabsched_sources=trace"));
        assert_eq!(config.level, tracing::Level::WARN);
    }

    #[test]
    fn default_log_settings() {
        let cli = Cli::parse_from(["frabsched", "schedule.xml"]);
        assert_eq!(cli.log_format, LogStyle::Compact);
        assert_eq!(cli.tracing_config(false), TracingConfig::default());

        let config = cli.tracing_config(true);
        assert_eq!(config, TracingConfig::cli(true));
    }

    #[test]
    fn pretty_logs_with_debug() {
        let cli = Cli::parse_from(["frabsched", "-v", "--log-format", "pretty", "x.xml"]);
        let config = cli.tracing_config(false);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.level, tracing::Level::DEBUG);
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let result = Cli::try_parse_from(["frabsched", "--log-format", "xml", "x.xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_subcommand() {
        let cli = Cli::parse_from(["frabsched", "config", "validate"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Validate
            })
        ));
    }
}
