//! Dependency validation
//!
//! - [`dependency`]: one declared requirement and its check state machine
//! - [`project`]: the dependencies of one lock file, checked together

pub mod dependency;
pub mod project;

pub use dependency::{Dependency, DependencyState};
pub use project::Project;
