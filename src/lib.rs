//! Checks that the gem versions locked in a `Gemfile.lock` match the
//! versions a project is expected to use.
//!
//! - [`parser`]: Gemfile.lock parsing into a [`parser::LockManifest`]
//! - [`version`]: registry access, gem version ordering and latest version selection
//! - [`check`]: [`check::Dependency`] state machine and [`check::Project`] aggregate
//! - [`report`]: pretty and JSON renderers
//! - [`source`]: loading lock files from paths, URLs and GitHub
//! - [`config`], [`cli`], [`logging`], [`runner`]: the command line shell

pub mod check;
pub mod cli;
pub mod config;
pub mod logging;
pub mod parser;
pub mod report;
pub mod runner;
pub mod source;
pub mod version;
