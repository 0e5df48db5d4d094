//! Latest version resolution
//!
//! Picks the version a dependency is expected to be locked at when no
//! explicit version was configured: the newest published release that
//! satisfies the dependency's [`VersionPolicy`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::version::error::RegistryError;
use crate::version::gem_version::GemVersion;
use crate::version::registry::RegistryClient;

/// Version selection policy of a dependency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionPolicy {
    /// Only consider releases sharing the locked version's major segment
    pub ignore_major_version_change: bool,
    /// Consider prereleases such as `4.0.0.rc1`
    pub allow_prerelease_dependencies: bool,
}

/// Resolves the latest acceptable version of a gem from a registry
pub struct RemoteVersionResolver {
    registry: Arc<dyn RegistryClient>,
}

impl RemoteVersionResolver {
    pub fn new(registry: Arc<dyn RegistryClient>) -> Self {
        Self { registry }
    }

    /// Query the registry and select the latest version under `policy`.
    ///
    /// `reference_version` is the locked version; it is only used for major
    /// version pinning. Returns `Ok(None)` when no published version survives
    /// filtering.
    pub async fn resolve_latest(
        &self,
        package_name: &str,
        policy: &VersionPolicy,
        reference_version: Option<&str>,
    ) -> Result<Option<String>, RegistryError> {
        let versions = self.registry.list_versions(package_name).await?;
        let latest = select_latest(&versions, policy, reference_version);

        debug!(
            "Resolved latest {} from {} candidates: {:?}",
            package_name,
            versions.len(),
            latest
        );

        Ok(latest)
    }
}

/// Select the greatest candidate allowed by `policy`.
///
/// Major pinning compares the leading integer segment only, so a reference of
/// `3.2.8` admits `3.3.0.rc1` but not `4.0.0`. An unparseable reference
/// disables major pinning.
pub fn select_latest(
    versions: &[String],
    policy: &VersionPolicy,
    reference_version: Option<&str>,
) -> Option<String> {
    let pinned_major = policy
        .ignore_major_version_change
        .then(|| reference_version.and_then(GemVersion::parse))
        .flatten()
        .map(|reference| reference.major());

    versions
        .iter()
        .filter_map(|v| {
            GemVersion::parse(v).or_else(|| {
                debug!("Skipping unparseable version {:?}", v);
                None
            })
        })
        .filter(|candidate| policy.allow_prerelease_dependencies || !candidate.is_prerelease())
        .filter(|candidate| pinned_major.is_none_or(|major| candidate.major() == major))
        .max()
        .map(|latest| latest.as_str().to_string())
}
