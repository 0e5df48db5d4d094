//! Validation of a single declared dependency against a lock manifest

use serde::Serialize;
use tracing::{debug, warn};

use crate::parser::types::LockManifest;
use crate::version::error::RegistryError;
use crate::version::gem_version::versions_equal;
use crate::version::resolver::{RemoteVersionResolver, VersionPolicy};

/// Result of checking a dependency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyState {
    /// `check` has not run yet
    #[default]
    Unchecked,
    /// Locked version equals the expected version
    Valid,
    /// Locked version differs from the expected version
    Invalid,
    /// The lock file does not pin this package
    NotUsed,
    /// The registry could not list versions for this package
    RegistryLookupFailed,
}

/// A declared requirement: a gem that should be locked at a given version,
/// or at the latest published version when none is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    name: String,
    expected_version: Option<String>,
    options: VersionPolicy,
    locked_version: Option<String>,
    latest_version: Option<String>,
    lookup_error: Option<String>,
    unknown_to_registry: bool,
    state: DependencyState,
}

impl Dependency {
    pub fn new(name: impl Into<String>, expected_version: Option<String>) -> Self {
        Self {
            name: name.into(),
            expected_version,
            options: VersionPolicy::default(),
            locked_version: None,
            latest_version: None,
            lookup_error: None,
            unknown_to_registry: false,
            state: DependencyState::Unchecked,
        }
    }

    pub fn with_options(mut self, options: VersionPolicy) -> Self {
        self.options = options;
        self
    }

    /// Check the dependency against `manifest`.
    ///
    /// The registry is only queried when the gem is locked and no explicit
    /// expected version was given. Calling `check` again recomputes every
    /// derived field from scratch.
    pub async fn check(&mut self, manifest: &LockManifest, resolver: &RemoteVersionResolver) {
        self.locked_version = None;
        self.latest_version = None;
        self.lookup_error = None;
        self.unknown_to_registry = false;

        let Some(locked) = manifest.lookup(&self.name) else {
            debug!("{} is not locked", self.name);
            self.state = DependencyState::NotUsed;
            return;
        };
        self.locked_version = Some(locked.to_string());

        let expected = match &self.expected_version {
            Some(expected) => Some(expected.clone()),
            None => match resolver
                .resolve_latest(&self.name, &self.options, Some(locked))
                .await
            {
                Ok(latest) => {
                    self.latest_version = latest.clone();
                    latest
                }
                Err(e) => {
                    warn!("Failed to look up {}: {}", self.name, e);
                    self.lookup_error = Some(e.to_string());
                    self.unknown_to_registry = matches!(e, RegistryError::NotFound(_));
                    self.state = DependencyState::RegistryLookupFailed;
                    return;
                }
            },
        };

        self.state = match expected {
            Some(expected) if versions_equal(locked, &expected) => DependencyState::Valid,
            _ => DependencyState::Invalid,
        };

        debug!("{} locked at {}: {:?}", self.name, locked, self.state);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicitly configured version, if any
    pub fn expected_version(&self) -> Option<&str> {
        self.expected_version.as_deref()
    }

    /// The version the locked version was compared against: the configured
    /// version, or the resolved latest version
    pub fn effective_expected_version(&self) -> Option<&str> {
        self.expected_version
            .as_deref()
            .or(self.latest_version.as_deref())
    }

    pub fn options(&self) -> &VersionPolicy {
        &self.options
    }

    pub fn locked_version(&self) -> Option<&str> {
        self.locked_version.as_deref()
    }

    pub fn latest_version(&self) -> Option<&str> {
        self.latest_version.as_deref()
    }

    /// Why the registry lookup failed, when it did
    pub fn lookup_error(&self) -> Option<&str> {
        self.lookup_error.as_deref()
    }

    pub fn state(&self) -> DependencyState {
        self.state
    }

    /// Whether the lock file pins this gem. False until checked.
    pub fn is_used(&self) -> bool {
        self.locked_version.is_some()
    }

    pub fn is_valid(&self) -> bool {
        self.state == DependencyState::Valid
    }

    pub fn is_gem_not_found(&self) -> bool {
        self.state == DependencyState::RegistryLookupFailed
    }

    /// The lookup failed because the registry has no such gem, as opposed
    /// to a network or server error
    pub fn is_unknown_to_registry(&self) -> bool {
        self.unknown_to_registry
    }

    /// Whether this dependency fails its project's check
    pub fn is_failed(&self) -> bool {
        matches!(
            self.state,
            DependencyState::Invalid | DependencyState::RegistryLookupFailed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::parser::{GemfileLockParser, Parser};
    use crate::version::error::RegistryError;
    use crate::version::registry::MockRegistryClient;

    const RAILS_APP_LOCK: &str = include_str!("../../tests/fixtures/rails_app_example.lock");

    fn lock_file() -> LockManifest {
        GemfileLockParser::new().parse(RAILS_APP_LOCK).unwrap()
    }

    fn registry_never_called() -> RemoteVersionResolver {
        let mut registry = MockRegistryClient::new();
        registry.expect_list_versions().times(0);
        RemoteVersionResolver::new(Arc::new(registry))
    }

    fn registry_with(versions: &[&str]) -> RemoteVersionResolver {
        let versions: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        let mut registry = MockRegistryClient::new();
        registry
            .expect_list_versions()
            .times(1)
            .returning(move |_| Ok(versions.clone()));
        RemoteVersionResolver::new(Arc::new(registry))
    }

    fn policy(ignore_major: bool, allow_prerelease: bool) -> VersionPolicy {
        VersionPolicy {
            ignore_major_version_change: ignore_major,
            allow_prerelease_dependencies: allow_prerelease,
        }
    }

    #[tokio::test]
    async fn is_valid_if_locked_version_equals_expected_version() {
        let mut dependency = Dependency::new("activesupport", Some("3.2.8".to_string()));

        dependency
            .check(&lock_file(), &registry_never_called())
            .await;

        assert!(dependency.is_valid());
        assert_eq!(dependency.state(), DependencyState::Valid);
        assert_eq!(dependency.locked_version(), Some("3.2.8"));
        assert_eq!(dependency.latest_version(), None);
    }

    #[tokio::test]
    async fn is_invalid_if_locked_version_differs_from_expected_version() {
        let mut dependency = Dependency::new("activesupport", Some("3.2.9".to_string()));

        dependency
            .check(&lock_file(), &registry_never_called())
            .await;

        assert!(!dependency.is_valid());
        assert_eq!(dependency.state(), DependencyState::Invalid);
        assert!(dependency.is_failed());
    }

    #[tokio::test]
    async fn is_invalid_when_locked_version_is_newer_than_expected() {
        let mut dependency = Dependency::new("activesupport", Some("3.2.0".to_string()));

        dependency
            .check(&lock_file(), &registry_never_called())
            .await;

        assert_eq!(dependency.state(), DependencyState::Invalid);
    }

    #[tokio::test]
    async fn is_not_used_without_registry_lookup_when_not_locked() {
        let mut dependency = Dependency::new("exceptionist", None);

        dependency
            .check(&lock_file(), &registry_never_called())
            .await;

        assert!(!dependency.is_used());
        assert_eq!(dependency.state(), DependencyState::NotUsed);
        assert!(!dependency.is_failed());
        assert!(!dependency.is_gem_not_found());
    }

    #[tokio::test]
    async fn is_used_when_locked() {
        let mut dependency = Dependency::new("activesupport", Some("3.2.8".to_string()));

        dependency
            .check(&lock_file(), &registry_never_called())
            .await;

        assert!(dependency.is_used());
    }

    #[tokio::test]
    async fn is_valid_when_locked_at_latest_version() {
        let mut dependency = Dependency::new("activesupport", None);

        dependency
            .check(&lock_file(), &registry_with(&["3.2.7", "3.2.8"]))
            .await;

        assert!(dependency.is_valid());
        assert_eq!(dependency.latest_version(), Some("3.2.8"));
        assert_eq!(dependency.effective_expected_version(), Some("3.2.8"));
    }

    #[tokio::test]
    async fn is_invalid_when_newer_version_is_published() {
        let mut dependency = Dependency::new("activesupport", None);

        dependency
            .check(&lock_file(), &registry_with(&["3.2.8", "3.2.9"]))
            .await;

        assert!(!dependency.is_valid());
        assert_eq!(dependency.latest_version(), Some("3.2.9"));
    }

    #[tokio::test]
    async fn is_valid_when_ignoring_the_major_version() {
        let mut dependency = Dependency::new("activesupport", None).with_options(policy(true, false));

        dependency
            .check(&lock_file(), &registry_with(&["3.2.8", "4.0.0"]))
            .await;

        assert!(dependency.is_valid());
    }

    #[tokio::test]
    async fn is_invalid_when_ignoring_the_major_version() {
        let mut dependency = Dependency::new("activesupport", None).with_options(policy(true, false));

        dependency
            .check(&lock_file(), &registry_with(&["3.2.8", "3.2.17", "4.0.0"]))
            .await;

        assert!(!dependency.is_valid());
        assert_eq!(dependency.latest_version(), Some("3.2.17"));
    }

    #[tokio::test]
    async fn retrieves_prerelease_as_the_latest_version_available() {
        let mut dependency = Dependency::new("activesupport", None).with_options(policy(false, true));

        dependency
            .check(&lock_file(), &registry_with(&["3.2.21", "4.0.0.rc1"]))
            .await;

        assert!(!dependency.is_valid());
        assert_eq!(dependency.latest_version(), Some("4.0.0.rc1"));
    }

    #[tokio::test]
    async fn retrieves_prerelease_as_the_latest_major_version_available() {
        let mut dependency = Dependency::new("activesupport", None).with_options(policy(true, true));

        dependency
            .check(&lock_file(), &registry_with(&["3.2.17", "3.3.0.rc1"]))
            .await;

        assert!(!dependency.is_valid());
        assert_eq!(dependency.latest_version(), Some("3.3.0.rc1"));
    }

    #[tokio::test]
    async fn is_invalid_when_no_published_version_survives_policy() {
        let mut dependency = Dependency::new("activesupport", None);

        dependency
            .check(&lock_file(), &registry_with(&["4.0.0.rc1"]))
            .await;

        assert_eq!(dependency.state(), DependencyState::Invalid);
        assert_eq!(dependency.latest_version(), None);
    }

    #[tokio::test]
    async fn gem_not_found_when_registry_does_not_know_the_gem() {
        let mut registry = MockRegistryClient::new();
        registry
            .expect_list_versions()
            .times(1)
            .returning(|name| Err(RegistryError::NotFound(name.to_string())));
        let resolver = RemoteVersionResolver::new(Arc::new(registry));

        let mut dependency = Dependency::new("rack", None);
        dependency.check(&lock_file(), &resolver).await;

        assert!(dependency.is_gem_not_found());
        assert_eq!(dependency.state(), DependencyState::RegistryLookupFailed);
        assert_eq!(dependency.lookup_error(), Some("Package not found: rack"));
        assert!(dependency.is_unknown_to_registry());
        assert!(dependency.is_failed());
    }

    #[tokio::test]
    async fn lookup_fails_when_registry_returns_invalid_response() {
        let mut registry = MockRegistryClient::new();
        registry
            .expect_list_versions()
            .times(1)
            .returning(|_| Err(RegistryError::InvalidResponse("HTTP 503".to_string())));
        let resolver = RemoteVersionResolver::new(Arc::new(registry));

        let mut dependency = Dependency::new("rack", None);
        dependency.check(&lock_file(), &resolver).await;

        assert_eq!(dependency.state(), DependencyState::RegistryLookupFailed);
        assert_eq!(
            dependency.lookup_error(),
            Some("Invalid response: HTTP 503")
        );
        assert!(!dependency.is_unknown_to_registry());
        assert_eq!(dependency.latest_version(), None);
        assert!(dependency.is_failed());
    }

    #[tokio::test]
    async fn gem_not_found_is_false_when_registry_knows_the_gem() {
        let mut dependency = Dependency::new("activesupport", None);

        dependency
            .check(&lock_file(), &registry_with(&["3.2.8"]))
            .await;

        assert!(!dependency.is_gem_not_found());
    }

    #[tokio::test]
    async fn check_is_idempotent() {
        let mut registry = MockRegistryClient::new();
        registry
            .expect_list_versions()
            .times(2)
            .returning(|_| Ok(vec!["3.2.8".to_string(), "3.2.9".to_string()]));
        let resolver = RemoteVersionResolver::new(Arc::new(registry));
        let manifest = lock_file();

        let mut dependency = Dependency::new("activesupport", None);
        dependency.check(&manifest, &resolver).await;
        let first = dependency.clone();
        dependency.check(&manifest, &resolver).await;

        assert_eq!(dependency, first);
        assert_eq!(dependency.state(), DependencyState::Invalid);
    }

    #[test]
    fn new_dependency_is_unchecked() {
        let dependency = Dependency::new("rails", None);

        assert_eq!(dependency.state(), DependencyState::Unchecked);
        assert!(!dependency.is_used());
        assert!(!dependency.is_failed());
    }
}
