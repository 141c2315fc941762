//! The content registry: the authoritative table for one content category.
//!
//! Readers always see a complete table. A replacement swaps the whole table
//! in one atomic pointer store, so a reader either sees the old table or the
//! new one, never a mix. Readers that took a [`snapshot`](ContentRegistry::snapshot)
//! keep the table they took for as long as they hold it.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;

use contentsum_core::CheckSum;

use crate::error::Result;
use crate::loader::{spawn_load, ContentLoader};
use crate::pending::Pending;
use crate::table::ContentTable;

/// Configuration for a registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Category label used in logs and checksum manifests.
    pub category: String,
    /// Whether reads first poll for a finished pending table.
    pub poll_pending_on_read: bool,
    /// Log each item's checksum at trace level while aggregating.
    pub trace_item_checksums: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            category: String::from("content"),
            poll_pending_on_read: true,
            trace_item_checksums: false,
        }
    }
}

impl RegistryConfig {
    /// Default configuration with the given category label.
    pub fn for_category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }
}

/// Lifecycle of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// No table has been delivered yet.
    Empty,
    /// At least one table has been installed.
    Populated,
}

/// Writer-side state, guarded by one lock.
///
/// Every write bumps `generation`. A table is only installed while this
/// lock is held, so installs are totally ordered and the latest write wins.
struct WriteState<T> {
    pending: Option<Pending<ContentTable<T>>>,
    generation: u64,
}

/// The owning container of named content items for one category.
pub struct ContentRegistry<T> {
    config: RegistryConfig,
    table: ArcSwap<ContentTable<T>>,
    writes: Mutex<WriteState<T>>,
    populated: AtomicBool,
}

impl<T> ContentRegistry<T> {
    /// Create an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            table: ArcSwap::from_pointee(ContentTable::new()),
            writes: Mutex::new(WriteState {
                pending: None,
                generation: 0,
            }),
            populated: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn category(&self) -> &str {
        &self.config.category
    }

    pub fn state(&self) -> RegistryState {
        if self.populated.load(Ordering::Acquire) {
            RegistryState::Populated
        } else {
            RegistryState::Empty
        }
    }

    pub fn is_populated(&self) -> bool {
        self.state() == RegistryState::Populated
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Point-in-time view of the whole table.
    pub fn snapshot(&self) -> Arc<ContentTable<T>> {
        self.refresh();
        self.table.load_full()
    }

    /// Look up an item by name. A missing name is not an error.
    pub fn lookup(&self, name: &str) -> Option<ContentRef<T>> {
        let snapshot = self.snapshot();
        let index = snapshot.position(name)?;
        Some(ContentRef { snapshot, index })
    }

    /// Every item in ascending name order, all pinned to one snapshot.
    pub fn items(&self) -> Vec<ContentRef<T>> {
        let snapshot = self.snapshot();
        (0..snapshot.len())
            .map(|index| ContentRef {
                snapshot: Arc::clone(&snapshot),
                index,
            })
            .collect()
    }

    /// Number of items in the current table.
    pub fn size(&self) -> usize {
        self.refresh();
        self.table.load().len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Atomically install a new table.
    ///
    /// The previous table is dropped once the last snapshot of it goes away.
    /// A pending table handed over earlier is older than this one and is
    /// discarded.
    pub fn replace(&self, table: ContentTable<T>) {
        let mut writes = self.write_state();
        writes.generation += 1;
        if writes.pending.take().is_some() {
            tracing::debug!(
                category = %self.config.category,
                "replaced table supersedes pending content table"
            );
        }
        self.install(&writes, table);
    }

    /// Hand over a table that is still being produced.
    ///
    /// Replaces any earlier pending table that has not been picked up yet.
    pub fn set_pending(&self, pending: Pending<ContentTable<T>>) {
        let mut writes = self.write_state();
        writes.generation += 1;
        if writes.pending.replace(pending).is_some() {
            tracing::debug!(
                category = %self.config.category,
                "discarding earlier pending content table"
            );
        }
    }

    /// Whether a pending table is waiting to be picked up.
    pub fn has_pending(&self) -> bool {
        self.write_state().pending.is_some()
    }

    /// Non-blocking poll of the pending table.
    ///
    /// Installs the table if it has arrived and returns `true`. A failed load
    /// is logged and dropped; the current table stays authoritative.
    pub fn poll_pending(&self) -> bool {
        let mut writes = self.write_state();
        let Some(pending) = writes.pending.as_mut() else {
            return false;
        };
        let Some(result) = pending.try_take() else {
            return false;
        };
        writes.pending = None;

        match result {
            Ok(table) => {
                tracing::info!(
                    category = %self.config.category,
                    items = table.len(),
                    "pending content table installed"
                );
                self.install(&writes, table);
                true
            }
            Err(e) => {
                tracing::warn!(
                    category = %self.config.category,
                    error = %e,
                    "content load failed; keeping current table"
                );
                false
            }
        }
    }

    fn refresh(&self) {
        if self.config.poll_pending_on_read {
            self.poll_pending();
        }
    }

    /// Swap in `table`. Taking the guard keeps every install under the
    /// writer lock.
    fn install(&self, _writes: &MutexGuard<'_, WriteState<T>>, table: ContentTable<T>) {
        let new_len = table.len();
        let previous = self.table.swap(Arc::new(table));
        self.populated.store(true, Ordering::Release);
        tracing::debug!(
            category = %self.config.category,
            previous = previous.len(),
            current = new_len,
            "content table replaced"
        );
    }

    fn write_state(&self) -> MutexGuard<'_, WriteState<T>> {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Send + 'static> ContentRegistry<T> {
    /// Start `loader` on the tokio runtime and keep its result pending.
    ///
    /// Must be called from within a tokio runtime. The table is installed by
    /// the next [`poll_pending`](Self::poll_pending) after the load finishes.
    pub fn spawn_load<L>(&self, loader: L)
    where
        L: ContentLoader<T> + 'static,
    {
        self.set_pending(spawn_load(loader));
    }

    /// Run `loader` to completion and install its table.
    ///
    /// On failure the current table is left in place and the error returned.
    /// A successful load counts as a write made when the load finishes.
    pub async fn load_from<L>(&self, loader: &L) -> Result<usize>
    where
        L: ContentLoader<T> + ?Sized,
    {
        match loader.load().await {
            Ok(table) => {
                let items = table.len();
                self.replace(table);
                Ok(items)
            }
            Err(e) => {
                tracing::warn!(
                    category = %self.config.category,
                    error = %e,
                    "content load failed; keeping current table"
                );
                Err(e)
            }
        }
    }

    /// Wait for the pending table, if any, and install it.
    ///
    /// Returns `Ok(false)` when nothing was pending, or when another write
    /// happened while waiting; the newer write then stays installed.
    pub async fn wait_pending(&self) -> Result<bool> {
        let (pending, generation) = {
            let mut writes = self.write_state();
            (writes.pending.take(), writes.generation)
        };
        let Some(pending) = pending else {
            return Ok(false);
        };
        let table = pending.wait().await?;

        let writes = self.write_state();
        if writes.generation != generation {
            tracing::debug!(
                category = %self.config.category,
                "newer write landed while waiting; dropping awaited table"
            );
            return Ok(false);
        }
        tracing::info!(
            category = %self.config.category,
            items = table.len(),
            "pending content table installed"
        );
        self.install(&writes, table);
        Ok(true)
    }
}

impl<T: CheckSum> ContentRegistry<T> {
    /// Aggregate checksum of the current table.
    ///
    /// This is the value exchanged with a peer for a consistency check.
    pub fn checksum(&self) -> u32 {
        let snapshot = self.snapshot();
        if self.config.trace_item_checksums {
            for (name, item) in snapshot.iter() {
                tracing::trace!(
                    category = %self.config.category,
                    name,
                    checksum = item.checksum(),
                    "item checksum"
                );
            }
        }
        let checksum = snapshot.checksum();
        tracing::debug!(
            category = %self.config.category,
            items = snapshot.len(),
            checksum,
            "registry checksum"
        );
        checksum
    }
}

impl<T> Default for ContentRegistry<T> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl<T> fmt::Debug for ContentRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRegistry")
            .field("category", &self.config.category)
            .field("state", &self.state())
            .field("items", &self.table.load().len())
            .finish()
    }
}

/// A handle to one item, keeping its table alive.
///
/// Holding a `ContentRef` pins the snapshot it came from; a later
/// [`replace`](ContentRegistry::replace) does not affect it.
pub struct ContentRef<T> {
    snapshot: Arc<ContentTable<T>>,
    index: usize,
}

impl<T> ContentRef<T> {
    pub fn name(&self) -> &str {
        &self.snapshot.entry(self.index).0
    }

    /// The table this item was read from.
    pub fn snapshot(&self) -> &Arc<ContentTable<T>> {
        &self.snapshot
    }
}

impl<T> Deref for ContentRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.snapshot.entry(self.index).1
    }
}

impl<T> Clone for ContentRef<T> {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            index: self.index,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ContentRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRef")
            .field("name", &self.name())
            .field("item", &**self)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::loader::StaticLoader;
    use contentsum_core::{ShipHull, ShipSlotType, Slot};

    fn hull(name: &str, structure: f32) -> ShipHull {
        ShipHull::builder(name)
            .structure(structure)
            .slot(Slot::new(ShipSlotType::Internal, 0.5, 0.5))
            .build()
    }

    fn table(hulls: Vec<ShipHull>) -> ContentTable<ShipHull> {
        ContentTable::from_items(hulls).unwrap()
    }

    #[test]
    fn test_starts_empty() {
        let registry: ContentRegistry<ShipHull> = ContentRegistry::default();
        assert_eq!(registry.state(), RegistryState::Empty);
        assert_eq!(registry.size(), 0);
        assert_eq!(registry.checksum(), 0);
        assert!(registry.lookup("SH_BASIC").is_none());
    }

    #[test]
    fn test_replace_populates() {
        let registry = ContentRegistry::new(RegistryConfig::for_category("hulls"));
        registry.replace(table(vec![hull("SH_BASIC", 10.0)]));
        assert_eq!(registry.state(), RegistryState::Populated);
        assert_eq!(registry.size(), 1);

        let found = registry.lookup("SH_BASIC").unwrap();
        assert_eq!(found.name(), "SH_BASIC");
        assert_eq!(found.structure(), 10.0);
    }

    #[test]
    fn test_items_in_name_order() {
        let registry = ContentRegistry::default();
        registry.replace(table(vec![hull("Gamma", 1.0), hull("Alpha", 1.0), hull("Beta", 1.0)]));
        let names: Vec<String> = registry.items().iter().map(|r| r.name().to_owned()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_replace_with_empty_stays_populated() {
        let registry = ContentRegistry::<ShipHull>::default();
        registry.replace(ContentTable::new());
        assert!(registry.is_populated());
        assert_eq!(registry.checksum(), 0);
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let registry = ContentRegistry::default();
        registry.replace(table(vec![hull("SH_OLD", 1.0)]));

        let held = registry.lookup("SH_OLD").unwrap();
        let snapshot = registry.snapshot();
        let old_checksum = snapshot.checksum();

        registry.replace(table(vec![hull("SH_NEW", 2.0)]));

        assert_eq!(held.structure(), 1.0);
        assert!(snapshot.contains("SH_OLD"));
        assert_eq!(snapshot.checksum(), old_checksum);
        assert!(registry.lookup("SH_OLD").is_none());
        assert!(registry.lookup("SH_NEW").is_some());
        assert_ne!(registry.checksum(), old_checksum);
    }

    #[test]
    fn test_checksum_matches_table() {
        let t = table(vec![hull("Beta", 1.0), hull("Alpha", 2.0)]);
        let expected = t.checksum();
        let registry = ContentRegistry::default();
        registry.replace(t);
        assert_eq!(registry.checksum(), expected);
    }

    #[test]
    fn test_pending_polled_on_read() {
        let registry = ContentRegistry::default();
        let (sender, pending) = Pending::channel();
        registry.set_pending(pending);

        assert!(registry.has_pending());
        assert_eq!(registry.size(), 0);
        assert_eq!(registry.state(), RegistryState::Empty);

        sender.send(Ok(table(vec![hull("SH_LATE", 3.0)])));
        assert!(registry.lookup("SH_LATE").is_some());
        assert!(!registry.has_pending());
        assert!(registry.is_populated());
    }

    #[test]
    fn test_pending_not_polled_when_disabled() {
        let config = RegistryConfig {
            poll_pending_on_read: false,
            ..RegistryConfig::default()
        };
        let registry = ContentRegistry::new(config);
        registry.set_pending(Pending::ready(Ok(table(vec![hull("SH_LATE", 3.0)]))));

        assert_eq!(registry.size(), 0);
        assert!(registry.poll_pending());
        assert_eq!(registry.size(), 1);
    }

    #[test]
    fn test_failed_load_keeps_previous_table() {
        let registry = ContentRegistry::default();
        registry.replace(table(vec![hull("SH_KEEP", 1.0)]));
        let before = registry.checksum();

        registry.set_pending(Pending::ready(Err(RegistryError::LoadFailed(
            "parse error".into(),
        ))));
        assert!(!registry.poll_pending());
        assert!(!registry.has_pending());
        assert_eq!(registry.checksum(), before);
        assert!(registry.lookup("SH_KEEP").is_some());
    }

    #[test]
    fn test_dropped_loader_keeps_previous_table() {
        let registry = ContentRegistry::default();
        registry.replace(table(vec![hull("SH_KEEP", 1.0)]));
        let (sender, pending) = Pending::channel();
        registry.set_pending(pending);
        drop(sender);

        assert!(!registry.poll_pending());
        assert_eq!(registry.size(), 1);
    }

    #[tokio::test]
    async fn test_load_from() {
        let registry = ContentRegistry::default();
        let loader = StaticLoader::new(table(vec![hull("A", 1.0), hull("B", 2.0)]));
        assert_eq!(registry.load_from(&loader).await, Ok(2));
        assert_eq!(registry.size(), 2);
    }

    #[tokio::test]
    async fn test_spawn_load_then_wait() {
        let registry = ContentRegistry::default();
        registry.spawn_load(StaticLoader::new(table(vec![hull("A", 1.0)])));
        assert_eq!(registry.wait_pending().await, Ok(true));
        assert_eq!(registry.size(), 1);
        assert_eq!(registry.wait_pending().await, Ok(false));
    }

    #[test]
    fn test_replace_supersedes_earlier_pending() {
        let registry = ContentRegistry::default();
        let stale = table(vec![hull("SH_STALE", 1.0)]);
        let fresh = table(vec![hull("SH_FRESH", 2.0)]);
        let expected = fresh.checksum();

        registry.set_pending(Pending::ready(Ok(stale)));
        registry.replace(fresh);

        assert!(!registry.has_pending());
        assert!(!registry.poll_pending());
        assert_eq!(registry.checksum(), expected);
        assert!(registry.lookup("SH_STALE").is_none());
    }

    #[test]
    fn test_pending_after_replace_still_installs() {
        let registry = ContentRegistry::default();
        registry.replace(table(vec![hull("SH_FIRST", 1.0)]));
        registry.set_pending(Pending::ready(Ok(table(vec![hull("SH_SECOND", 2.0)]))));

        assert!(registry.poll_pending());
        assert!(registry.lookup("SH_FIRST").is_none());
        assert!(registry.lookup("SH_SECOND").is_some());
    }

    #[tokio::test]
    async fn test_replace_while_waiting_wins() {
        let registry = ContentRegistry::default();
        let stale = table(vec![hull("SH_STALE", 1.0)]);
        let fresh = table(vec![hull("SH_FRESH", 2.0)]);
        let expected = fresh.checksum();

        let (sender, pending) = Pending::channel();
        registry.set_pending(pending);

        // The waiter is polled first and parks on the channel; the table it
        // receives is delivered only after the newer replace.
        let (waited, _) = tokio::join!(registry.wait_pending(), async {
            tokio::task::yield_now().await;
            registry.replace(fresh);
            sender.send(Ok(stale));
        });

        assert_eq!(waited, Ok(false));
        assert_eq!(registry.checksum(), expected);
        assert!(registry.lookup("SH_STALE").is_none());
    }

    #[test]
    fn test_interleaved_writes_end_on_latest() {
        let registry = Arc::new(ContentRegistry::<ShipHull>::default());
        let last = table(vec![hull("SH_LAST", 9.0)]);
        let expected = last.checksum();

        let writers: Vec<_> = (0..4)
            .map(|w| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let name = format!("SH_{w}_{i}");
                        let next = table(vec![hull(&name, 1.0)]);
                        if i % 2 == 0 {
                            registry.set_pending(Pending::ready(Ok(next)));
                        } else {
                            registry.replace(next);
                        }
                        registry.poll_pending();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        registry.replace(last);
        assert!(!registry.poll_pending());
        assert_eq!(registry.checksum(), expected);
    }

    #[test]
    fn test_concurrent_readers_see_whole_tables() {
        let first = table(vec![hull("A", 1.0), hull("B", 1.0)]);
        let second = table(vec![hull("C", 2.0), hull("D", 2.0), hull("E", 2.0)]);
        let valid = [first.checksum(), second.checksum()];

        let registry = Arc::new(ContentRegistry::default());
        registry.replace(first.clone());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = registry.snapshot();
                        assert!(valid.contains(&snapshot.checksum()));
                    }
                })
            })
            .collect();

        for i in 0..200 {
            if i % 2 == 0 {
                registry.replace(second.clone());
            } else {
                registry.replace(first.clone());
            }
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
