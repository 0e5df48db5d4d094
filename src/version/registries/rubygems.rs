//! RubyGems.org API implementation

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexSet;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::FETCH_TIMEOUT_MS;
use crate::version::error::RegistryError;
use crate::version::registry::RegistryClient;

/// Default base URL for the RubyGems API
pub const DEFAULT_BASE_URL: &str = "https://rubygems.org";

/// One entry of `GET /api/v1/versions/{name}.json`
#[derive(Debug, Deserialize)]
struct GemVersionEntry {
    number: String,
}

/// Registry implementation for the RubyGems.org versions API
pub struct RubyGemsRegistry {
    client: Client,
    base_url: String,
}

impl RubyGemsRegistry {
    /// Creates a new RubyGemsRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .user_agent(concat!("gem-version-check/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for RubyGemsRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl RegistryClient for RubyGemsRegistry {
    async fn list_versions(&self, package_name: &str) -> Result<Vec<String>, RegistryError> {
        let url = format!("{}/api/v1/versions/{}.json", self.base_url, package_name);
        debug!("Fetching RubyGems versions: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !status.is_success() {
            warn!("RubyGems returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let entries: Vec<GemVersionEntry> = response.json().await.map_err(|e| {
            warn!("Failed to parse RubyGems response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        // Platform builds share a number (nokogiri 1.16.0 ships one per platform)
        let versions: IndexSet<String> = entries.into_iter().map(|entry| entry.number).collect();

        debug!("Found {} versions for gem {}", versions.len(), package_name);

        Ok(versions.into_iter().collect())
    }
}
