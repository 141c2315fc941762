//! Checksum manifests: the per-category checksums a peer reports.
//!
//! A manifest is an in-memory value. How it travels between processes is up
//! to the session layer that owns the connection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Checksums of every content category known to one process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumManifest {
    checksums: BTreeMap<String, u32>,
}

impl ChecksumManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the checksum for a category, replacing any earlier value.
    pub fn insert(&mut self, category: impl Into<String>, checksum: u32) {
        self.checksums.insert(category.into(), checksum);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, category: impl Into<String>, checksum: u32) -> Self {
        self.insert(category, checksum);
        self
    }

    pub fn get(&self, category: &str) -> Option<u32> {
        self.checksums.get(category).copied()
    }

    /// Categories and checksums in ascending category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.checksums
            .iter()
            .map(|(category, checksum)| (category.as_str(), *checksum))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.checksums.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.checksums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checksums.is_empty()
    }
}

impl FromIterator<(String, u32)> for ChecksumManifest {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            checksums: iter.into_iter().collect(),
        }
    }
}
