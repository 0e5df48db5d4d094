//! Registry client trait for listing published gem versions

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// Lists every published version of a package.
///
/// Implementations apply no filtering: prereleases and all major versions are
/// returned, and selection policy is left to
/// [`RemoteVersionResolver`](crate::version::resolver::RemoteVersionResolver).
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetches all versions for a package from the registry
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Version strings in registry order
    /// * `Err(RegistryError::NotFound)` - The package does not exist
    /// * `Err(RegistryError)` - Any other fetch failure
    async fn list_versions(&self, package_name: &str) -> Result<Vec<String>, RegistryError>;
}
