//! Startup settings: command-line flags merged over the preferences file.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use cloudgate_util::{DEFAULT_REGIONS, PreferencesPayload, expand_tilde};

/// Deadline for a single cloud call when neither a flag nor a preference sets one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Overrides the log file location.
pub const LOG_PATH_ENV: &str = "CLOUDGATE_LOG_PATH";
/// `EnvFilter` directives for the log file.
pub const LOG_FILTER_ENV: &str = "CLOUDGATE_LOG";

#[derive(Debug, Parser)]
#[command(name = "cloudgate", version, about = "Inspect and drive cloud delivery pipelines from the terminal")]
pub struct Cli {
    /// Theme id or alias (dracula, nord, ansi256).
    #[arg(long, value_name = "THEME")]
    pub theme: Option<String>,

    /// Store --theme as the preferred theme for later sessions.
    #[arg(long, requires = "theme")]
    pub save_theme: bool,

    /// Path to the aws executable. Defaults to `aws` on PATH.
    #[arg(long, value_name = "PATH")]
    pub aws_cli: Option<PathBuf>,

    /// Deadline for each cloud call, in seconds.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Log file location.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,
}

/// Effective configuration for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub theme: Option<String>,
    pub aws_cli: Option<PathBuf>,
    pub timeout: Duration,
    pub regions: Vec<String>,
}

impl Settings {
    /// Flags win over preferences; built-in defaults fill the rest.
    pub fn resolve(cli: &Cli, preferences: &PreferencesPayload) -> Self {
        let regions: Vec<String> = preferences
            .regions
            .iter()
            .map(|region| region.trim())
            .filter(|region| !region.is_empty())
            .map(str::to_string)
            .collect();
        let regions = if regions.is_empty() {
            DEFAULT_REGIONS.iter().map(|region| region.to_string()).collect()
        } else {
            regions
        };
        let timeout_secs = cli
            .timeout_secs
            .or(preferences.task_timeout_secs.filter(|secs| *secs > 0))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            theme: cli.theme.clone().or_else(|| preferences.preferred_theme.clone()),
            aws_cli: cli
                .aws_cli
                .clone()
                .or_else(|| preferences.aws_cli_path.as_deref().map(expand_tilde)),
            timeout: Duration::from_secs(timeout_secs),
            regions,
        }
    }
}

/// Log file chosen by `--log-path`, then `CLOUDGATE_LOG_PATH`, then the cache directory.
pub fn log_path(cli: &Cli) -> PathBuf {
    cli.log_path
        .clone()
        .or_else(|| env::var_os(LOG_PATH_ENV).filter(|value| !value.is_empty()).map(PathBuf::from))
        .unwrap_or_else(default_log_path)
}

fn default_log_path() -> PathBuf {
    dirs_next::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("cloudgate")
        .join("cloudgate.log")
}
