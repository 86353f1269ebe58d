//! Configuration commands.

use std::path::Path;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &CliConfig, path: &Path) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::config(format!("failed to serialize config: {e}")))?;
    println!("# config.toml ({})", path.display());
    println!("{toml_str}");
    Ok(())
}

/// Validate the configuration, listing every problem found.
pub fn validate(config: &CliConfig) -> CliResult<()> {
    match config.validate() {
        Ok(()) => {
            println!(
                "Configuration is valid ({} feed{}).",
                config.feeds.len(),
                if config.feeds.len() == 1 { "" } else { "s" }
            );
            Ok(())
        }
        Err(problems) => {
            for problem in &problems {
                eprintln!("  - {problem}");
            }
            Err(CliError::config(format!(
                "{} problem{} found",
                problems.len(),
                if problems.len() == 1 { "" } else { "s" }
            )))
        }
    }
}

/// Show the configuration file path.
pub fn path(path: &Path) -> CliResult<()> {
    let marker = if path.exists() { "" } else { " (not found)" };
    println!("config: {}{marker}", path.display());
    Ok(())
}
