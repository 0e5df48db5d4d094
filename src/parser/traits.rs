//! Parser trait definition

use crate::parser::types::LockManifest;

/// Trait for parsing lock files into a manifest of pinned versions
pub trait Parser {
    /// Parse the content and extract the top-level pinned packages
    fn parse(&self, content: &str) -> Result<LockManifest, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// Content does not start with a lock file section
    #[error("Missing section header before line {line}")]
    MissingSection { line: usize },

    /// A pinned entry is not of the form `name (version)`
    #[error("Invalid entry on line {line}: {content:?}")]
    InvalidEntry { line: usize, content: String },
}
