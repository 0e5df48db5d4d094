//! Report rendering for checked projects
//!
//! - [`pretty`]: colored human-readable text
//! - [`json`]: machine-readable JSON

pub mod json;
pub mod pretty;

use serde::Deserialize;

use crate::check::Project;

pub use json::JsonFormatter;
pub use pretty::PrettyPrintFormatter;

/// Renders a list of projects after they have been checked
pub trait Formatter {
    fn format(&self, projects: &[Project]) -> String;
}

/// Output format selectable from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "pretty_print")]
    #[value(alias = "pretty_print")]
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn formatter(&self) -> Box<dyn Formatter> {
        match self {
            OutputFormat::Pretty => Box::new(PrettyPrintFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}
