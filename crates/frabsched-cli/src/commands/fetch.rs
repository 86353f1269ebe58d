//! The default command: fetch schedules and print their records.

use frabsched_core::ScheduleEvent;
use frabsched_sources::{AutoTransport, FetchConfig, ScheduleImporter, Transport};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// One schedule to import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    /// URL or path of the schedule.
    pub url: String,
    /// Group label for its records.
    pub group: String,
    /// Target timezone for JSON schedules.
    pub timezone: Option<String>,
}

/// Works out which schedules to import.
///
/// An explicit SOURCE wins, then `--feed`, then every configured feed.
/// `--timezone` overrides a feed's own timezone.
pub fn resolve_targets(cli: &Cli, config: &CliConfig) -> CliResult<Vec<FetchTarget>> {
    if let Some(ref source) = cli.source {
        return Ok(vec![FetchTarget {
            url: source.clone(),
            group: cli.group.clone(),
            timezone: cli.timezone.clone(),
        }]);
    }

    let feeds = match cli.feed {
        Some(ref name) => vec![
            config
                .feed(name)
                .ok_or_else(|| CliError::config(format!("unknown feed {name:?}")))?,
        ],
        None => config.feeds.iter().collect(),
    };

    if feeds.is_empty() {
        return Err(CliError::config(
            "no schedule given and no feeds configured",
        ));
    }

    Ok(feeds
        .into_iter()
        .map(|feed| FetchTarget {
            url: feed.url.clone(),
            group: feed.group().to_string(),
            timezone: cli.timezone.clone().or_else(|| feed.timezone.clone()),
        })
        .collect())
}

/// Builds the transport settings from the config file and CLI overrides.
pub fn fetch_config(cli: &Cli, config: &CliConfig) -> FetchConfig {
    let mut fetch = config.fetch.to_fetch_config();
    if let Some(secs) = cli.timeout {
        fetch = fetch.with_timeout(std::time::Duration::from_secs(secs));
    }
    if cli.insecure {
        fetch = fetch.with_insecure_tls();
    }
    fetch
}

/// Imports every target in order, stopping at the first failure.
pub fn fetch_all<T: Transport>(
    importer: &ScheduleImporter<T>,
    targets: &[FetchTarget],
) -> CliResult<Vec<ScheduleEvent>> {
    let mut events = Vec::new();
    for target in targets {
        let imported = match target.timezone {
            Some(ref tz) => importer.get_schedule_with_timezone(&target.url, &target.group, tz)?,
            None => importer.get_schedule(&target.url, &target.group)?,
        };
        debug!(url = %target.url, count = imported.len(), "imported schedule");
        events.extend(imported);
    }
    Ok(events)
}

/// Runs the default command.
pub fn run(cli: &Cli, config: &CliConfig) -> CliResult<()> {
    let targets = resolve_targets(cli, config)?;

    #[cfg(feature = "http")]
    let transport = AutoTransport::new(&fetch_config(cli, config))?;
    #[cfg(not(feature = "http"))]
    let transport = AutoTransport::new()?;

    let events = fetch_all(&ScheduleImporter::new(transport), &targets)?;
    info!(schedules = targets.len(), events = events.len(), "import finished");

    println!("{}", cli.output_format().render(&events)?);
    Ok(())
}
