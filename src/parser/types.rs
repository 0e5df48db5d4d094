//! Common types for parsers

use indexmap::IndexMap;
use indexmap::map::Entry;

/// A package pinned in a lock file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedGem {
    /// Locked version without any platform suffix (e.g., "1.16.0")
    pub version: String,
    /// Platform the gem was locked for (e.g., "x86_64-linux"), if any
    pub platform: Option<String>,
    /// Line number (1-indexed) of the entry
    pub line: usize,
}

/// Ordered index of the packages pinned in a lock file.
///
/// Each name maps to at most one entry; the first entry seen wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockManifest {
    gems: IndexMap<String, LockedGem>,
}

impl LockManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pinned gem. Returns false if the name was already pinned,
    /// in which case the earlier entry is kept.
    pub fn insert(&mut self, name: &str, gem: LockedGem) -> bool {
        match self.gems.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(gem);
                true
            }
        }
    }

    /// Locked version of `name`, or `None` if the project does not use it
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.gems.get(name).map(|gem| gem.version.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&LockedGem> {
        self.gems.get(name)
    }

    /// Pinned gems in lock file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LockedGem)> {
        self.gems.iter().map(|(name, gem)| (name.as_str(), gem))
    }

    pub fn len(&self) -> usize {
        self.gems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }
}
