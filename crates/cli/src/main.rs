use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::Parser;
use cloudgate_api::AwsCliFactory;
use cloudgate_tui::RunOptions;
use cloudgate_util::{UserPreferences, discover_profiles};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod settings;

use settings::{Cli, LOG_FILTER_ENV, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&settings::log_path(&cli))?;

    let preferences = load_preferences();
    if cli.save_theme {
        save_theme(&preferences, cli.theme.as_deref())?;
    }
    let settings = Settings::resolve(&cli, &preferences.snapshot());

    let profiles = discover_profiles().unwrap_or_else(|error| {
        warn!(%error, "AWS profile discovery failed; only manual entry is available");
        Vec::new()
    });
    info!(
        profiles = profiles.len(),
        regions = settings.regions.len(),
        timeout_secs = settings.timeout.as_secs(),
        "starting cloudgate"
    );

    let factory = Arc::new(AwsCliFactory::new(settings.aws_cli, settings.timeout));
    cloudgate_tui::run(RunOptions {
        profiles,
        regions: settings.regions,
        factory,
        theme: settings.theme,
    })
    .await
}

/// Send logs to a file; the terminal belongs to the UI.
fn init_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn load_preferences() -> UserPreferences {
    match UserPreferences::new() {
        Ok(preferences) => preferences,
        Err(error) => {
            warn!(%error, "failed to load preferences; using defaults");
            UserPreferences::ephemeral()
        }
    }
}

/// Stores `theme` as the preferred theme. Returns whether it reached disk.
fn save_theme(preferences: &UserPreferences, theme: Option<&str>) -> Result<bool> {
    let Some(name) = theme else {
        return Ok(false);
    };
    let Some(definition) = cloudgate_tui::resolve_theme(name.trim()) else {
        bail!("unknown theme '{name}'");
    };
    preferences
        .set_preferred_theme(Some(definition.id.to_string()))
        .with_context(|| format!("failed to save preferences to {}", preferences.path().display()))?;
    if !preferences.is_persistent() {
        warn!(theme = definition.id, "preferences file is unavailable; theme applies to this session only");
        return Ok(false);
    }
    info!(theme = definition.id, path = %preferences.path().display(), "preferred theme saved");
    Ok(true)
}
