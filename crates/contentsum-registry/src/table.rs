//! Immutable content tables.
//!
//! A [`ContentTable`] is the unit the registry swaps: a complete set of named
//! content items, sorted by name. Once built it is never mutated.

use std::collections::BTreeMap;

use contentsum_core::{checksum_of, CheckSum, Composite, ShipHull};

use crate::error::{RegistryError, Result};

/// A content item that knows its own unique name.
pub trait ContentItem: CheckSum {
    /// The unique key of this item within its table.
    fn name(&self) -> &str;
}

impl ContentItem for ShipHull {
    fn name(&self) -> &str {
        ShipHull::name(self)
    }
}

/// A complete, name-sorted set of content items.
///
/// Entries are kept as a vector sorted by name with no duplicates, so
/// iteration is always in ascending name order and lookups are binary
/// searches.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentTable<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for ContentTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ContentTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from an ordered map; keys are already unique and sorted.
    pub fn from_map(items: BTreeMap<String, T>) -> Self {
        Self {
            entries: items.into_iter().collect(),
        }
    }

    /// Build from `(name, item)` pairs in any order.
    ///
    /// Fails on the first repeated name.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, T)>,
    {
        let mut map = BTreeMap::new();
        for (name, item) in entries {
            if map.contains_key(&name) {
                return Err(RegistryError::DuplicateName(name));
            }
            map.insert(name, item);
        }
        Ok(Self::from_map(map))
    }

    /// Look up an item by name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.position(name).map(|index| &self.entries[index].1)
    }

    /// Index of `name` in the sorted entries.
    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .binary_search_by(|(key, _)| key.as_str().cmp(name))
            .ok()
    }

    pub(crate) fn entry(&self, index: usize) -> &(String, T) {
        &self.entries[index]
    }

    /// Whether an item with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterate `(name, item)` in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.entries.iter().map(|(name, item)| (name.as_str(), item))
    }

    /// Names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ContentItem> ContentTable<T> {
    /// Build from items keyed by their own names.
    pub fn from_items<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_entries(
            items
                .into_iter()
                .map(|item| (item.name().to_owned(), item)),
        )
    }
}

impl<T: CheckSum> ContentTable<T> {
    /// Aggregate checksum over every entry.
    ///
    /// Entries are folded as `(name, item)` pairs in ascending name order,
    /// with each item contributing its own checksum, followed by the entry
    /// count. An empty table has checksum 0.
    pub fn checksum(&self) -> u32 {
        let entries: Vec<(&str, Composite<'_, T>)> = self
            .entries
            .iter()
            .map(|(name, item)| (name.as_str(), Composite(item)))
            .collect();
        checksum_of(&entries)
    }
}

impl<T: CheckSum> CheckSum for ContentTable<T> {
    fn checksum(&self) -> u32 {
        ContentTable::checksum(self)
    }
}
