//! Discovery of named AWS profiles from the shared config and credentials files.
//!
//! The AWS CLI reads profiles from two INI-style files:
//!
//! - `~/.aws/config` with `[default]` and `[profile NAME]` sections
//! - `~/.aws/credentials` with `[NAME]` sections
//!
//! Both locations can be overridden with `AWS_CONFIG_FILE` and
//! `AWS_SHARED_CREDENTIALS_FILE`. Missing files are not an error.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::home_dir;
use thiserror::Error;
use tracing::debug;

use crate::expand_tilde;

pub const CONFIG_FILE_ENV: &str = "AWS_CONFIG_FILE";
pub const CREDENTIALS_FILE_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";

const DEFAULT_PROFILE: &str = "default";

/// Commercial regions offered when preferences do not list any.
pub const DEFAULT_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-north-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "sa-east-1",
];

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Copy)]
enum SectionStyle {
    /// `[default]` and `[profile NAME]`.
    Config,
    /// `[NAME]`.
    Credentials,
}

/// Returns every profile named in the config and credentials files, without
/// duplicates, sorted with `default` first.
pub fn discover_profiles() -> Result<Vec<String>, DiscoveryError> {
    let config = resolve_path(CONFIG_FILE_ENV, "config");
    let credentials = resolve_path(CREDENTIALS_FILE_ENV, "credentials");
    discover_profiles_in(config.as_deref(), credentials.as_deref())
}

/// Same as [`discover_profiles`] with explicit file locations.
pub fn discover_profiles_in(config: Option<&Path>, credentials: Option<&Path>) -> Result<Vec<String>, DiscoveryError> {
    let mut names = BTreeSet::new();
    if let Some(path) = config {
        names.extend(read_sections(path, SectionStyle::Config)?);
    }
    if let Some(path) = credentials {
        names.extend(read_sections(path, SectionStyle::Credentials)?);
    }

    let has_default = names.remove(DEFAULT_PROFILE);
    let mut profiles = Vec::with_capacity(names.len() + 1);
    if has_default {
        profiles.push(DEFAULT_PROFILE.to_string());
    }
    profiles.extend(names);
    debug!(count = profiles.len(), "discovered AWS profiles");
    Ok(profiles)
}

fn resolve_path(env_var: &str, file_name: &str) -> Option<PathBuf> {
    if let Ok(value) = env::var(env_var)
        && !value.trim().is_empty()
    {
        return Some(expand_tilde(&value));
    }
    home_dir().map(|home| home.join(".aws").join(file_name))
}

fn read_sections(path: &Path, style: SectionStyle) -> Result<Vec<String>, DiscoveryError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(DiscoveryError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    Ok(contents.lines().filter_map(|line| section_profile(line, style)).collect())
}

fn section_profile(line: &str, style: SectionStyle) -> Option<String> {
    let header = line.trim().strip_prefix('[')?.strip_suffix(']')?.trim();
    let name = match style {
        SectionStyle::Credentials => header,
        SectionStyle::Config if header == DEFAULT_PROFILE => header,
        // sso-session and services sections are not profiles
        SectionStyle::Config => header.strip_prefix("profile ")?.trim(),
    };
    (!name.is_empty()).then(|| name.to_string())
}
