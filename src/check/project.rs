//! A project: declared dependencies checked against one lock manifest

use futures::future::join_all;
use tracing::info;

use crate::check::dependency::Dependency;
use crate::parser::gemfile_lock::GemfileLockParser;
use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::LockManifest;
use crate::version::resolver::RemoteVersionResolver;

#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    dependencies: Vec<Dependency>,
    manifest: LockManifest,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        dependencies: Vec<Dependency>,
        manifest: LockManifest,
    ) -> Self {
        Self {
            name: name.into(),
            dependencies,
            manifest,
        }
    }

    /// Build a project from raw Gemfile.lock content
    pub fn parse(
        name: impl Into<String>,
        dependencies: Vec<Dependency>,
        lockfile: &str,
    ) -> Result<Self, ParseError> {
        let manifest = GemfileLockParser::new().parse(lockfile)?;
        Ok(Self::new(name, dependencies, manifest))
    }

    /// Check every dependency against the manifest.
    ///
    /// Lookups run concurrently; results stay in declaration order and a
    /// failed lookup only affects its own dependency.
    pub async fn check(&mut self, resolver: &RemoteVersionResolver) {
        let manifest = &self.manifest;
        join_all(
            self.dependencies
                .iter_mut()
                .map(|dependency| dependency.check(manifest, resolver)),
        )
        .await;

        let failed = self.dependencies.iter().filter(|d| d.is_failed()).count();
        info!(
            "Checked {} dependencies of {}: {} failed",
            self.dependencies.len(),
            self.name,
            failed
        );
    }

    /// True iff any dependency is invalid or could not be looked up
    pub fn check_failed(&self) -> bool {
        self.dependencies.iter().any(Dependency::is_failed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dependencies in declaration order
    pub fn report(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn manifest(&self) -> &LockManifest {
        &self.manifest
    }
}
