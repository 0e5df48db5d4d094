//! Command line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::debug;

use crate::config::{Config, ConfigError, DependencyConfig, ProjectConfig, config_path};
use crate::report::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "gem-version-check")]
#[command(
    version,
    about = "Check that gems locked in Gemfile.lock match expected or latest released versions"
)]
pub struct Cli {
    /// Lock files to check: local paths, URLs or GitHub `owner/repo`
    pub lockfiles: Vec<String>,

    /// Config file (defaults to $XDG_CONFIG_HOME/gem-version-check/config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dependency to check, optionally pinned to an expected version
    #[arg(short = 'd', long = "dependency", value_name = "NAME[=VERSION]")]
    pub dependencies: Vec<DependencyConfig>,

    /// Only compare against releases with the locked major version
    #[arg(long)]
    pub ignore_major_version_change: bool,

    /// Treat prereleases as candidates for the latest version
    #[arg(long)]
    pub allow_prerelease_dependencies: bool,

    #[arg(short, long, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// RubyGems API base URL
    #[arg(long)]
    pub registry_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Load the explicit config file, or the default one if it exists
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        match &self.config {
            Some(path) => Config::load(path),
            None => {
                let path = config_path();
                if path.is_file() {
                    Config::load(&path)
                } else {
                    debug!("No config file at {}", path.display());
                    Ok(Config::default())
                }
            }
        }
    }

    /// Apply command line arguments on top of `config`.
    ///
    /// Lock files and dependencies given on the command line replace the
    /// configured ones; policy flags can only switch a policy on.
    pub fn apply(&self, mut config: Config) -> Config {
        if !self.lockfiles.is_empty() {
            config.projects = self
                .lockfiles
                .iter()
                .map(|lockfile| ProjectConfig {
                    name: None,
                    lockfile: lockfile.clone(),
                })
                .collect();
        }
        if !self.dependencies.is_empty() {
            config.dependencies = self.dependencies.clone();
        }
        if let Some(output_format) = self.output_format {
            config.output_format = output_format;
        }
        if let Some(registry_url) = &self.registry_url {
            config.registry_url = registry_url.clone();
        }
        config.policy.ignore_major_version_change |= self.ignore_major_version_change;
        config.policy.allow_prerelease_dependencies |= self.allow_prerelease_dependencies;
        config
    }
}
