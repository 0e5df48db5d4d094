//! JSON report

use serde::Serialize;
use tracing::error;

use crate::check::{Dependency, DependencyState, Project};
use crate::report::Formatter;

#[derive(Debug, Serialize)]
struct ProjectReport<'a> {
    name: &'a str,
    check_failed: bool,
    dependencies: Vec<DependencyReport<'a>>,
}

#[derive(Debug, Serialize)]
struct DependencyReport<'a> {
    name: &'a str,
    state: DependencyState,
    used: bool,
    expected_version: Option<&'a str>,
    locked_version: Option<&'a str>,
    latest_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> From<&'a Dependency> for DependencyReport<'a> {
    fn from(dependency: &'a Dependency) -> Self {
        Self {
            name: dependency.name(),
            state: dependency.state(),
            used: dependency.is_used(),
            expected_version: dependency.effective_expected_version(),
            locked_version: dependency.locked_version(),
            latest_version: dependency.latest_version(),
            error: dependency.lookup_error(),
        }
    }
}

impl<'a> From<&'a Project> for ProjectReport<'a> {
    fn from(project: &'a Project) -> Self {
        Self {
            name: project.name(),
            check_failed: project.check_failed(),
            dependencies: project.report().iter().map(DependencyReport::from).collect(),
        }
    }
}

/// Renders projects as a pretty-printed JSON array
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, projects: &[Project]) -> String {
        let reports: Vec<ProjectReport> = projects.iter().map(ProjectReport::from).collect();

        serde_json::to_string_pretty(&reports)
            .inspect_err(|e| error!("Failed to serialize report: {}", e))
            .unwrap_or_default()
    }
}
