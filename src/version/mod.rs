//! Version layer for gem version checking
//!
//! This module fetches published gem versions and decides which of them a
//! locked dependency is expected to match.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Registry   │────▶│   Resolver   │────▶│  GemVersion  │
//! │ (list vers.) │     │   (policy)   │     │  (ordering)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Registries  │
//! │  (RubyGems)  │
//! └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Registry client trait for listing published versions
//! - [`registries`]: Concrete registry implementations (RubyGems.org)
//! - [`resolver`]: Latest version selection under a [`resolver::VersionPolicy`]
//! - [`gem_version`]: Parsed RubyGems versions and their ordering
//! - [`error`]: Error types for registry operations

pub mod error;
pub mod gem_version;
pub mod registries;
pub mod registry;
pub mod resolver;
