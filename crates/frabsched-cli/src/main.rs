//! frabsched CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use frabsched_cli::cli::{Cli, Command, ConfigAction};
use frabsched_cli::commands;
use frabsched_cli::config::CliConfig;
use frabsched_cli::error::CliResult;
use frabsched_core::init_tracing;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);

    let result = load_config(&cli, &config_path).and_then(|config| {
        if let Err(e) = init_tracing(cli.tracing_config(config.debug)) {
            eprintln!("warning: {e}");
        }
        run(&cli, &config, &config_path)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// An explicit `--config` must exist; the default location is optional.
fn load_config(cli: &Cli, path: &Path) -> CliResult<CliConfig> {
    if cli.config.is_some() {
        CliConfig::load_from(path)
    } else {
        CliConfig::load()
    }
}

fn run(cli: &Cli, config: &CliConfig, config_path: &Path) -> CliResult<()> {
    match cli.command {
        Some(Command::Config { ref action }) => match action {
            ConfigAction::Dump => commands::config::dump(config, config_path),
            ConfigAction::Validate => commands::config::validate(config),
            ConfigAction::Path => commands::config::path(config_path),
        },
        None => commands::fetch::run(cli, config),
    }
}
