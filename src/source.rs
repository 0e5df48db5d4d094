//! Lock file sources
//!
//! A lock file is given as a local path (file or directory containing a
//! `Gemfile.lock`), an `http(s)://` URL, or a GitHub `owner/repo` shorthand
//! resolved against the repository's default branch.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::FETCH_TIMEOUT_MS;

/// Default base URL for raw GitHub content
pub const DEFAULT_GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";

pub const LOCKFILE_NAME: &str = "Gemfile.lock";

static GITHUB_REPO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").unwrap());

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Lock file not found: {0}")]
    NotFound(String),

    #[error("Unexpected status {status} fetching {url}")]
    InvalidResponse { url: String, status: u16 },

    #[error("Unrecognized lock file source: {0}")]
    Unrecognized(String),
}

/// Where a project's lock file lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockfileSource {
    Path(PathBuf),
    Url(String),
    GitHub { owner: String, repo: String },
}

impl LockfileSource {
    /// Classify a source string.
    ///
    /// Existing local paths take precedence over the `owner/repo` shorthand.
    /// Input that looks like a file path (`/abs`, `./rel`, `app/Gemfile.lock`,
    /// more than one separator) stays a path even when missing, so a typo
    /// fails with an I/O error instead of a GitHub request.
    pub fn parse(input: &str) -> Result<Self, SourceError> {
        let input = input.trim();

        if input.starts_with("http://") || input.starts_with("https://") {
            return Ok(LockfileSource::Url(input.to_string()));
        }

        let path = Path::new(input);
        if path.is_dir() {
            return Ok(LockfileSource::Path(path.join(LOCKFILE_NAME)));
        }
        if path.is_file() {
            return Ok(LockfileSource::Path(path.to_path_buf()));
        }

        if looks_like_local_path(input) {
            return Ok(LockfileSource::Path(path.to_path_buf()));
        }

        if let Some(caps) = GITHUB_REPO_PATTERN.captures(input) {
            let (owner, repo) = (&caps[1], &caps[2]);
            if ![owner, repo].iter().any(|part| matches!(*part, "." | "..")) {
                return Ok(LockfileSource::GitHub {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                });
            }
        }

        Err(SourceError::Unrecognized(input.to_string()))
    }

    /// Name used for the project when none is configured
    pub fn default_project_name(&self) -> String {
        match self {
            LockfileSource::Path(path) => path
                .parent()
                .map(|dir| {
                    let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
                    dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf())
                })
                .and_then(|dir| {
                    dir.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                })
                .unwrap_or_else(|| path.display().to_string()),
            LockfileSource::Url(url) => url.clone(),
            LockfileSource::GitHub { owner, repo } => format!("{}/{}", owner, repo),
        }
    }
}

fn looks_like_local_path(input: &str) -> bool {
    let path = Path::new(input);
    path.is_absolute()
        || input.starts_with("./")
        || input.starts_with("../")
        || input.ends_with(".lock")
        || path.components().count() > 2
}

/// Loads lock file content from any [`LockfileSource`]
pub struct LockfileFetcher {
    client: Client,
    github_raw_url: String,
}

impl LockfileFetcher {
    pub fn new(github_raw_url: &str) -> Self {
        let client = Client::builder()
            .user_agent(concat!("gem-version-check/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            github_raw_url: github_raw_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch(&self, source: &LockfileSource) -> Result<String, SourceError> {
        match source {
            LockfileSource::Path(path) => {
                debug!("Reading lock file {}", path.display());
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            LockfileSource::Url(url) => self.fetch_url(url).await,
            LockfileSource::GitHub { owner, repo } => {
                let url = format!(
                    "{}/{}/{}/HEAD/{}",
                    self.github_raw_url, owner, repo, LOCKFILE_NAME
                );
                self.fetch_url(&url).await
            }
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<String, SourceError> {
        debug!("Fetching lock file {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            return Err(SourceError::InvalidResponse {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

impl Default for LockfileFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_GITHUB_RAW_URL)
    }
}
