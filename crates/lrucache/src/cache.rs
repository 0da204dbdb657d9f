//! LRU cache façade
//!
//! Couples the [`Index`] and the [`RecencyList`] and keeps them in lock-step:
//! every key in the index has exactly one linked node, and every linked node
//! is reachable from the index by its key.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::config::{CacheConfig, Capacity};
use crate::error::Result;
use crate::index::Index;
use crate::list::{Iter, RecencyList};
use crate::stats::CacheStats;

/// Upper bound on slots reserved up front; larger caches grow on demand
const MAX_PREALLOC: usize = 4096;

/// LRU cache with fixed capacity
///
/// `get` and `put` are O(1). Once `capacity` keys are present, putting a new
/// key evicts the least recently used one.
pub struct LruCache<K, V> {
    index: Index<K>,
    list: RecencyList<K, V>,
    capacity: Capacity,
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, must be greater than 0
    ///
    /// # Returns
    /// * `Result<LruCache>` - `Error::InvalidCapacity` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::with_capacity(Capacity::try_from(capacity)?))
    }

    /// Create a cache from a validated configuration
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_capacity(config.capacity)
    }

    /// Create a cache from a validated capacity
    pub fn with_capacity(capacity: Capacity) -> Self {
        let cap = capacity.get();
        debug!(capacity = cap, "creating LRU cache");

        let prealloc = cap.min(MAX_PREALLOC);
        Self {
            index: Index::with_capacity(prealloc),
            list: RecencyList::with_capacity(prealloc),
            capacity,
            stats: CacheStats::new(),
        }
    }

    /// Get a value and mark its key as most recently used
    ///
    /// A miss leaves the cache untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(id) = self.index.lookup(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        self.list.touch(id);
        trace!("touched entry");
        self.list.entry(id).map(|(_, v)| v)
    }

    /// Like [`get`](Self::get), but yields a mutable reference
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(id) = self.index.lookup(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        self.list.touch(id);
        self.list.value_mut(id)
    }

    /// Read a value without changing recency or stats
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.lookup(key)?;
        self.list.entry(id).map(|(_, v)| v)
    }

    /// Check for a key without changing recency or stats
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.lookup(key).is_some()
    }

    /// Insert a key-value pair into the cache
    ///
    /// A present key gets its value replaced and becomes most recently used.
    /// A new key on a full cache evicts the least recently used entry first.
    pub fn put(&mut self, key: K, value: V) {
        self.push(key, value);
    }

    /// Same as [`put`](Self::put), returning what left the cache
    ///
    /// # Returns
    /// * `Some((key, old_value))` - `key` was present and its value replaced
    /// * `Some((lru_key, lru_value))` - the entry evicted to make room
    /// * `None` - nothing was displaced
    pub fn push(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(id) = self.index.lookup(&key) {
            let old = self
                .list
                .value_mut(id)
                .map(|slot| std::mem::replace(slot, value));
            self.list.touch(id);
            self.stats.record_update();
            return old.map(|v| (key, v));
        }

        let evicted = if self.index.len() >= self.capacity.get() {
            self.evict()
        } else {
            None
        };

        let id = self.list.alloc(key.clone(), value);
        self.list.append_most_recent(id);
        self.index.insert(key, id);
        self.stats.record_insert();
        debug_assert_eq!(self.index.len(), self.list.len());

        evicted
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.remove(key)?;
        self.list.detach(id);
        debug!(len = self.index.len(), "removed entry");
        self.list.release(id).map(|(_, v)| v)
    }

    /// Least recently used entry, the next one to be evicted
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.least_recent().and_then(|id| self.list.entry(id))
    }

    /// Entries from least to most recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.index.len() == 0
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Zero all statistics counters
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Drop every entry. Capacity and statistics are kept.
    pub fn clear(&mut self) {
        let dropped = self.index.len();
        self.index.clear();
        self.list.clear();
        debug!(dropped, "cleared cache");
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let id = self.list.least_recent()?;
        if let Some(key) = self.list.key(id) {
            self.index.remove(key);
        }
        self.list.detach(id);
        self.stats.record_eviction();
        debug!(capacity = self.capacity.get(), "evicted least recently used entry");
        self.list.release(id)
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        assert_eq!(self.index.len(), self.list.len());
        assert!(self.len() <= self.capacity());

        let mut linked = 0;
        for (key, _) in self.list.iter() {
            let id = self.index.lookup(key).expect("linked key missing from index");
            assert!(self.list.key(id) == Some(key));
            linked += 1;
        }
        assert_eq!(linked, self.index.len());
    }
}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
