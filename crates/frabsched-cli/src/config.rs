//! CLI configuration.
//!
//! Settings live in `~/.config/frabsched/config.toml` by default:
//!
//! ```toml
//! [fetch]
//! timeout = 30
//!
//! [[feeds]]
//! name = "warwick"
//! url = "https://warwickhack.co.uk/schedule.json"
//! timezone = "Europe/London"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use frabsched_core::resolve_timezone;
use frabsched_sources::FetchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Configuration for the frabsched CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Debug logging.
    pub debug: bool,

    /// HTTP fetch settings.
    pub fetch: FetchSettings,

    /// Named schedule feeds.
    pub feeds: Vec<FeedSettings>,
}

/// HTTP fetch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Request timeout in seconds.
    pub timeout: u64,

    /// User agent override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Whether to verify TLS certificates.
    pub verify_tls: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: FetchConfig::DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            verify_tls: true,
        }
    }
}

impl FetchSettings {
    /// Converts to a transport configuration.
    pub fn to_fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::new().with_timeout(Duration::from_secs(self.timeout));
        if let Some(ref user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        if !self.verify_tls {
            config = config.with_insecure_tls();
        }
        config
    }
}

/// A named schedule feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSettings {
    /// Name used with `--feed`.
    pub name: String,

    /// URL or path of the schedule.
    pub url: String,

    /// Group label for the records; defaults to the feed name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Target timezone for JSON schedules; defaults to UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl FeedSettings {
    /// Returns the group label used for this feed's records.
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(&self.name)
    }
}

impl CliConfig {
    /// Loads configuration from the default path, or defaults if it does
    /// not exist.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            CliError::config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("frabsched")
    }

    /// Looks up a feed by name.
    pub fn feed(&self, name: &str) -> Option<&FeedSettings> {
        self.feeds.iter().find(|f| f.name == name)
    }

    /// Checks feeds for empty fields, duplicate names and unknown
    /// timezones. Returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        if self.fetch.timeout == 0 {
            problems.push("fetch.timeout must be greater than zero".to_string());
        }

        for (index, feed) in self.feeds.iter().enumerate() {
            let label = if feed.name.is_empty() {
                format!("feeds[{index}]")
            } else {
                format!("feed {:?}", feed.name)
            };

            if feed.name.trim().is_empty() {
                problems.push(format!("{label}: name must not be empty"));
            }
            if feed.url.trim().is_empty() {
                problems.push(format!("{label}: url must not be empty"));
            }
            if feed.group().trim().is_empty() {
                problems.push(format!("{label}: group must not be empty"));
            }
            if let Some(ref tz) = feed.timezone {
                if let Err(e) = resolve_timezone(tz) {
                    problems.push(format!("{label}: {e}"));
                }
            }
            if self.feeds[..index].iter().any(|f| f.name == feed.name) {
                problems.push(format!("{label}: duplicate feed name"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
debug = true

[fetch]
timeout = 10
user_agent = "camp-bot/2"

[[feeds]]
name = "warwick"
url = "https://warwickhack.co.uk/schedule.json"
timezone = "Europe/London"

[[feeds]]
name = "camp"
url = "https://events.ccc.de/camp/2023/schedule.xml"
group = "ccc-camp"
"#;

    #[test]
    fn parses_sample() {
        let config: CliConfig = toml::from_str(SAMPLE).unwrap();
        assert!(config.debug);
        assert_eq!(config.fetch.timeout, 10);
        assert_eq!(config.fetch.user_agent.as_deref(), Some("camp-bot/2"));
        assert!(config.fetch.verify_tls);
        assert_eq!(config.feeds.len(), 2);

        let warwick = config.feed("warwick").unwrap();
        assert_eq!(warwick.group(), "warwick");
        assert_eq!(warwick.timezone.as_deref(), Some("Europe/London"));

        let camp = config.feed("camp").unwrap();
        assert_eq!(camp.group(), "ccc-camp");
        assert!(camp.timezone.is_none());

        assert!(config.feed("missing").is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.fetch.timeout, 30);
        assert!(config.feeds.is_empty());
    }

    #[test]
    fn fetch_settings_convert() {
        let settings = FetchSettings {
            timeout: 7,
            user_agent: Some("ua/1".to_string()),
            verify_tls: false,
        };
        let fetch = settings.to_fetch_config();
        assert_eq!(fetch.timeout, Duration::from_secs(7));
        assert_eq!(fetch.user_agent, "ua/1");
        assert!(!fetch.verify_tls);

        let fetch = FetchSettings::default().to_fetch_config();
        assert_eq!(fetch.user_agent, FetchConfig::default_user_agent());
    }

    #[test]
    fn validate_reports_every_problem() {
        let config = CliConfig {
            fetch: FetchSettings {
                timeout: 0,
                ..FetchSettings::default()
            },
            feeds: vec![
                FeedSettings {
                    name: "a".to_string(),
                    url: String::new(),
                    group: None,
                    timezone: Some("Moon/Base".to_string()),
                },
                FeedSettings {
                    name: "a".to_string(),
                    url: "a.json".to_string(),
                    group: Some(" ".to_string()),
                    timezone: None,
                },
            ],
            ..CliConfig::default()
        };

        let problems = config.validate().unwrap_err();
        assert_eq!(problems.len(), 5, "{problems:?}");
        assert!(problems.iter().any(|p| p.contains("timeout")));
        assert!(problems.iter().any(|p| p.contains("url must not be empty")));
        assert!(problems.iter().any(|p| p.contains("Moon/Base")));
        assert!(problems.iter().any(|p| p.contains("group must not be empty")));
        assert!(problems.iter().any(|p| p.contains("duplicate")));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = CliConfig::load_from(file.path()).unwrap();
        assert_eq!(config.feeds.len(), 2);
    }

    #[test]
    fn load_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[[feeds]]\nname = 3\n").unwrap();

        let err = CliConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load_from(&dir.path().join("config.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn dump_round_trips() {
        let config: CliConfig = toml::from_str(SAMPLE).unwrap();
        let dumped = toml::to_string_pretty(&config).unwrap();
        let back: CliConfig = toml::from_str(&dumped).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn default_path_ends_with_config_toml() {
        let path = CliConfig::default_path();
        assert!(path.ends_with("frabsched/config.toml"));
    }
}
