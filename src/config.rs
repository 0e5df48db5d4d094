use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::report::OutputFormat;
use crate::source::DEFAULT_GITHUB_RAW_URL;
use crate::version::registries::rubygems::DEFAULT_BASE_URL;
use crate::version::resolver::VersionPolicy;

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level configuration file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the RubyGems API
    pub registry_url: String,
    /// Base URL used to resolve `owner/repo` lock file sources
    pub github_raw_url: String,
    pub output_format: OutputFormat,
    /// Policy applied to dependencies that don't override it
    #[serde(flatten)]
    pub policy: VersionPolicy,
    pub projects: Vec<ProjectConfig>,
    pub dependencies: Vec<DependencyConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_BASE_URL.to_string(),
            github_raw_url: DEFAULT_GITHUB_RAW_URL.to_string(),
            output_format: OutputFormat::default(),
            policy: VersionPolicy::default(),
            projects: Vec::new(),
            dependencies: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// A project to check
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Display name; derived from the lock file source when omitted
    #[serde(default)]
    pub name: Option<String>,
    /// Path, URL or GitHub `owner/repo` of the lock file
    pub lockfile: String,
}

/// A declared dependency
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DependencyConfig {
    pub name: String,
    /// Expected version; the latest published version when omitted
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub ignore_major_version_change: Option<bool>,
    #[serde(default)]
    pub allow_prerelease_dependencies: Option<bool>,
}

impl DependencyConfig {
    /// The dependency's own policy, falling back to `defaults` per flag
    pub fn policy(&self, defaults: &VersionPolicy) -> VersionPolicy {
        VersionPolicy {
            ignore_major_version_change: self
                .ignore_major_version_change
                .unwrap_or(defaults.ignore_major_version_change),
            allow_prerelease_dependencies: self
                .allow_prerelease_dependencies
                .unwrap_or(defaults.allow_prerelease_dependencies),
        }
    }
}

/// Parses the command line form `name` or `name=version`
impl FromStr for DependencyConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) = match s.split_once('=') {
            Some((name, version)) => (name.trim(), Some(version.trim())),
            None => (s.trim(), None),
        };

        if name.is_empty() {
            return Err(format!("missing gem name in {:?}", s));
        }
        if version.is_some_and(str::is_empty) {
            return Err(format!("missing version in {:?}", s));
        }

        Ok(Self {
            name: name.to_string(),
            version: version.map(str::to_string),
            ignore_major_version_change: None,
            allow_prerelease_dependencies: None,
        })
    }
}

/// Returns the path to the config directory for gem-version-check.
/// Uses $XDG_CONFIG_HOME/gem-version-check if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/gem-version-check,
/// or ./gem-version-check if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("gem-version-check")
}
