//! Snapshot coordination: build modes, wholesale rebuild, and the
//! iteration lock.

use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use log::debug;

use super::lookup::AddressQuery;
use super::region::MapRegion;
use super::store::RegionStore;
use crate::domain::{MapsError, Pid};
use crate::reader::{MapsSource, ProcFs, ProcessMemory};

/// Options applied whenever a snapshot populates its store.
#[derive(Debug, Clone, Default)]
pub struct SnapshotOptions {
    /// Listing entries whose path ends with one of these suffixes are
    /// excluded at parse time (used to filter synthetic or
    /// instrumentation-only mappings).
    pub suffixes_to_ignore: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Built once at construction, explicitly rebuildable.
    Cached,
    /// One-shot parse of the current instant; frozen afterwards.
    Uncached,
    /// Built from an externally supplied region list; frozen.
    Static,
}

/// A point-in-time (or live-rebuildable) materialization of a process's
/// mapped regions.
///
/// The store is the single shared mutable resource: only [`rebuild`]
/// mutates it, wholesale, under the write lock. All queries take the read
/// lock and are safe to run concurrently with each other. A reader holding
/// the guard from [`regions`] observes a store that cannot change
/// mid-traversal; a rebuild either completed before the guard was granted
/// or waits until it is dropped.
///
/// [`rebuild`]: MapSnapshot::rebuild
/// [`regions`]: MapSnapshot::regions
pub struct MapSnapshot {
    pid: Pid,
    mode: Mode,
    options: SnapshotOptions,
    source: Box<dyn MapsSource + Send + Sync>,
    store: RwLock<RegionStore>,
    memory: Option<Arc<dyn ProcessMemory>>,
}

impl MapSnapshot {
    /// Build a cached, rebuildable snapshot of a live process from
    /// `/proc`.
    ///
    /// # Errors
    /// Fails when the mapping listing cannot be read (process exited,
    /// permission denied). A listing that parses to zero records is not an
    /// error; check [`is_empty`](Self::is_empty) if that matters to you.
    pub fn new(pid: Pid) -> Result<Self, MapsError> {
        Self::new_with(pid, SnapshotOptions::default())
    }

    /// Same as [`new`](Self::new) with explicit options.
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn new_with(pid: Pid, options: SnapshotOptions) -> Result<Self, MapsError> {
        Self::from_source(pid, Box::new(ProcFs), options)
    }

    /// Build a one-shot snapshot of the process's mappings as of this
    /// call.
    ///
    /// The result represents a specific instant and refuses to be rebuilt.
    /// Do not hand an uncached snapshot to consumers that expect a stable,
    /// long-lived, rebuildable view.
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn new_uncached(pid: Pid) -> Result<Self, MapsError> {
        Self::new_uncached_with(pid, SnapshotOptions::default())
    }

    /// Same as [`new_uncached`](Self::new_uncached) with explicit options.
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn new_uncached_with(pid: Pid, options: SnapshotOptions) -> Result<Self, MapsError> {
        Self::construct(pid, Box::new(ProcFs), options, Mode::Uncached)
    }

    /// Build a cached snapshot from a custom listing source.
    ///
    /// # Errors
    /// Fails when `source` cannot produce the listing.
    pub fn from_source(
        pid: Pid,
        source: Box<dyn MapsSource + Send + Sync>,
        options: SnapshotOptions,
    ) -> Result<Self, MapsError> {
        Self::construct(pid, source, options, Mode::Cached)
    }

    /// Build an uncached snapshot from a custom listing source.
    ///
    /// # Errors
    /// Fails when `source` cannot produce the listing.
    pub fn from_source_uncached(
        pid: Pid,
        source: Box<dyn MapsSource + Send + Sync>,
        options: SnapshotOptions,
    ) -> Result<Self, MapsError> {
        Self::construct(pid, source, options, Mode::Uncached)
    }

    /// Build a static snapshot from externally constructed records.
    ///
    /// Records are copied in the given order, still subject to the
    /// ignore-suffix filter. The result is frozen: it never touches the
    /// live process and refuses to be rebuilt.
    #[must_use]
    pub fn from_regions(pid: Pid, regions: Vec<MapRegion>, options: SnapshotOptions) -> Self {
        let mut store = RegionStore::new(options.suffixes_to_ignore.clone());
        store.populate_from_regions(regions);
        Self {
            pid,
            mode: Mode::Static,
            options,
            source: Box::new(ProcFs),
            store: RwLock::new(store),
            memory: None,
        }
    }

    fn construct(
        pid: Pid,
        source: Box<dyn MapsSource + Send + Sync>,
        options: SnapshotOptions,
        mode: Mode,
    ) -> Result<Self, MapsError> {
        let lines = source
            .map_lines(pid)
            .map_err(|source| MapsError::MapsUnreadable { pid, source })?;

        let mut store = RegionStore::new(options.suffixes_to_ignore.clone());
        store.populate_from_lines(&lines);
        debug!("built snapshot for {pid}: {} regions, {} lines skipped", store.len(), store.skipped_lines());

        Ok(Self { pid, mode, options, source, store: RwLock::new(store), memory: None })
    }

    /// Wire up a raw-memory backend so [`AddressQuery::process_memory`]
    /// reports it. Base snapshots work without one.
    #[must_use]
    pub fn with_process_memory(mut self, memory: Arc<dyn ProcessMemory>) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Re-read the live listing and replace the store contents, returning
    /// the new record count.
    ///
    /// The replacement is atomic from a reader's perspective: the fresh
    /// store is parsed before the write lock is taken, so no partially
    /// updated sequence is ever observable and readers are blocked only
    /// for the swap.
    ///
    /// # Errors
    /// - [`MapsError::FrozenSnapshot`] for uncached and static snapshots.
    /// - [`MapsError::MapsUnreadable`] when the listing cannot be read;
    ///   the store is left unchanged in that case.
    pub fn rebuild(&self) -> Result<usize, MapsError> {
        if self.mode != Mode::Cached {
            return Err(MapsError::FrozenSnapshot(self.pid));
        }

        let lines = self
            .source
            .map_lines(self.pid)
            .map_err(|source| MapsError::MapsUnreadable { pid: self.pid, source })?;

        let mut fresh = RegionStore::new(self.options.suffixes_to_ignore.clone());
        fresh.populate_from_lines(&lines);
        let count = fresh.len();

        *self.write_store() = fresh;
        debug!("rebuilt snapshot for {}: {count} regions", self.pid);
        Ok(count)
    }

    /// Acquire the iteration lock and return a guard over the store.
    ///
    /// The read lock is held for the guard's entire lifetime and released
    /// on every exit path, so a traversal can never observe a concurrent
    /// rebuild mid-flight. Keep the guard alive for the whole traversal.
    #[must_use]
    pub fn regions(&self) -> RegionsGuard<'_> {
        RegionsGuard(self.read_store())
    }

    #[must_use]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Whether [`rebuild`](Self::rebuild) is permitted on this snapshot.
    #[must_use]
    pub fn is_rebuildable(&self) -> bool {
        self.mode == Mode::Cached
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read_store().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_store().is_empty()
    }

    /// Listing lines dropped by the last build because they failed to
    /// parse.
    #[must_use]
    pub fn skipped_lines(&self) -> u64 {
        self.read_store().skipped_lines()
    }

    /// The configured ignore-suffix set.
    #[must_use]
    pub fn suffixes_to_ignore(&self) -> &[String] {
        &self.options.suffixes_to_ignore
    }

    // A panicked writer cannot leave a torn store (contents are swapped
    // wholesale), so a poisoned lock is still structurally intact and we
    // recover the guard.
    fn read_store(&self) -> RwLockReadGuard<'_, RegionStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> std::sync::RwLockWriteGuard<'_, RegionStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AddressQuery for MapSnapshot {
    fn fill_in(&self, addr: u64) -> Option<MapRegion> {
        self.read_store().find(addr).cloned()
    }

    fn process_memory(&self) -> Option<Arc<dyn ProcessMemory>> {
        self.memory.clone()
    }
}

/// RAII guard over the region store.
///
/// Derefs to [`RegionStore`], so borrowed lookups and slice iteration are
/// available without extra locking while the guard is held.
pub struct RegionsGuard<'a>(RwLockReadGuard<'a, RegionStore>);

impl Deref for RegionsGuard<'_> {
    type Target = RegionStore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a RegionsGuard<'_> {
    type Item = &'a MapRegion;
    type IntoIter = std::slice::Iter<'a, MapRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.regions().iter()
    }
}
