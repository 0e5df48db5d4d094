//! Registry test utilities

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use gem_version_check::version::error::RegistryError;
use gem_version_check::version::registry::RegistryClient;

/// In-memory registry that records which gems were looked up
#[derive(Default)]
pub struct MockRegistry {
    versions: HashMap<String, Vec<String>>,
    requests: Mutex<Vec<String>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, package: &str, versions: Vec<&str>) -> Self {
        self.versions.insert(
            package.to_string(),
            versions.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Gems requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistryClient for MockRegistry {
    async fn list_versions(&self, package_name: &str) -> Result<Vec<String>, RegistryError> {
        self.requests.lock().unwrap().push(package_name.to_string());

        match self.versions.get(package_name) {
            Some(versions) => Ok(versions.clone()),
            None => Err(RegistryError::NotFound(package_name.to_string())),
        }
    }
}
