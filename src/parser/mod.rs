//! Parser layer
//! - traits.rs: Parser trait definition and ParseError
//! - types.rs: LockManifest and LockedGem
//! - gemfile_lock.rs: Bundler Gemfile.lock parser

pub mod gemfile_lock;
pub mod traits;
pub mod types;

pub use gemfile_lock::GemfileLockParser;
pub use traits::{ParseError, Parser};
pub use types::{LockManifest, LockedGem};
