//! Terminal-name index
//!
//! Maps the final segment of every value-bearing key to the set of full
//! (root-relative, canonical) keys that end in it, so that "every key named
//! `Time`" does not have to walk the whole tree. The tree updates it under
//! the same write lock as the node mutation it mirrors.

use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default)]
pub struct SuffixIndex {
    by_terminal: HashMap<String, BTreeSet<String>>,
}

impl SuffixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` under `terminal`. Returns false if it was already present.
    pub fn insert(&mut self, terminal: &str, key: String) -> bool {
        self.by_terminal
            .entry(terminal.to_string())
            .or_default()
            .insert(key)
    }

    /// Forget `key`. Empty buckets are dropped.
    pub fn remove(&mut self, terminal: &str, key: &str) -> bool {
        let Some(keys) = self.by_terminal.get_mut(terminal) else {
            return false;
        };
        let removed = keys.remove(key);
        if keys.is_empty() {
            self.by_terminal.remove(terminal);
        }
        removed
    }

    pub fn get(&self, terminal: &str) -> Option<&BTreeSet<String>> {
        self.by_terminal.get(terminal)
    }

    #[cfg(test)]
    pub fn contains(&self, terminal: &str, key: &str) -> bool {
        self.by_terminal
            .get(terminal)
            .map(|keys| keys.contains(key))
            .unwrap_or(false)
    }

    /// Total number of indexed keys
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.by_terminal.values().map(BTreeSet::len).sum()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.by_terminal.is_empty()
    }
}
