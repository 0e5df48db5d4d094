//! Builds projects from configuration and checks them

use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::info;

use crate::check::{Dependency, Project};
use crate::config::{Config, ProjectConfig};
use crate::source::{LockfileFetcher, LockfileSource};
use crate::version::registry::RegistryClient;
use crate::version::resolver::RemoteVersionResolver;

/// Fresh, unchecked dependencies declared by `config`
pub fn declared_dependencies(config: &Config) -> Vec<Dependency> {
    config
        .dependencies
        .iter()
        .map(|dependency| {
            Dependency::new(dependency.name.clone(), dependency.version.clone())
                .with_options(dependency.policy(&config.policy))
        })
        .collect()
}

/// Load and parse the lock file of one configured project
pub async fn load_project(
    project: &ProjectConfig,
    dependencies: Vec<Dependency>,
    fetcher: &LockfileFetcher,
) -> anyhow::Result<Project> {
    let source = LockfileSource::parse(&project.lockfile)?;
    let name = project
        .name
        .clone()
        .unwrap_or_else(|| source.default_project_name());

    let content = fetcher
        .fetch(&source)
        .await
        .with_context(|| format!("Failed to load lock file for {}", name))?;

    let project = Project::parse(name.clone(), dependencies, &content)
        .with_context(|| format!("Failed to parse lock file for {}", name))?;

    info!(
        "Loaded {} with {} locked gems",
        project.name(),
        project.manifest().len()
    );

    Ok(project)
}

/// Load every configured project and check it against the registry.
///
/// Projects are returned in configuration order. Lock file and parse errors
/// abort the run; registry failures are recorded per dependency.
pub async fn run(
    config: &Config,
    registry: Arc<dyn RegistryClient>,
    fetcher: &LockfileFetcher,
) -> anyhow::Result<Vec<Project>> {
    if config.projects.is_empty() {
        bail!("No lock files given");
    }
    if config.dependencies.is_empty() {
        bail!("No dependencies configured");
    }

    let resolver = RemoteVersionResolver::new(registry);
    let mut projects = Vec::with_capacity(config.projects.len());

    for project_config in &config.projects {
        let mut project =
            load_project(project_config, declared_dependencies(config), fetcher).await?;
        project.check(&resolver).await;
        projects.push(project);
    }

    Ok(projects)
}
