//! Colored text report

use colored::Colorize;

use crate::check::{Dependency, DependencyState, Project};
use crate::report::Formatter;

/// Renders one title line per project, green if it passed and red if it
/// failed, followed by one line per dependency.
///
/// ```text
/// Project: my_app
///  * activesupport: 3.2.8 ✓
///  * rack: 1.4.5 != 1.4.1
///  * exceptionist: not used
/// ```
pub struct PrettyPrintFormatter;

impl Formatter for PrettyPrintFormatter {
    fn format(&self, projects: &[Project]) -> String {
        projects
            .iter()
            .map(|project| format!("{}\n{}", project_title(project), format_project(project)))
            .collect()
    }
}

fn project_title(project: &Project) -> String {
    let name = if project.check_failed() {
        project.name().red()
    } else {
        project.name().green()
    };
    format!("Project: {}", name)
}

fn format_project(project: &Project) -> String {
    project
        .report()
        .iter()
        .map(|dependency| format!(" * {}: {}\n", dependency.name(), format_dependency(dependency)))
        .collect()
}

fn format_dependency(dependency: &Dependency) -> String {
    let expected = dependency.effective_expected_version().unwrap_or("none");
    let locked = dependency.locked_version().unwrap_or_default();

    match dependency.state() {
        DependencyState::Unchecked => "not checked".to_string(),
        DependencyState::NotUsed => "not used".to_string(),
        DependencyState::Valid => format!("{} ✓", expected).green().to_string(),
        DependencyState::Invalid => format!("{} != {}", expected, locked.red()),
        DependencyState::RegistryLookupFailed if dependency.is_unknown_to_registry() => {
            "not found".red().to_string()
        }
        DependencyState::RegistryLookupFailed => {
            let reason = dependency.lookup_error().unwrap_or("unknown error");
            format!("lookup failed: {}", reason).red().to_string()
        }
    }
}
