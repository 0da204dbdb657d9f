//! Thread-safe wrapper around [`LruCache`]
//!
//! One mutex guards the index and the recency list together, since every
//! operation (including a hit) rewrites the list.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::LruCache;
use crate::config::Capacity;
use crate::error::Result;

/// Shared, cloneable handle to a mutex-guarded [`LruCache`]
pub struct SharedLruCache<K, V> {
    inner: Arc<Mutex<LruCache<K, V>>>,
}

impl<K, V> Clone for SharedLruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a shared cache with the given capacity
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from(LruCache::new(capacity)?))
    }

    /// Create a shared cache from a validated capacity
    pub fn with_capacity(capacity: Capacity) -> Self {
        Self::from(LruCache::with_capacity(capacity))
    }

    /// Get a clone of the value and mark the key most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Insert a key-value pair, evicting the LRU entry when full
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    /// Insert a key-value pair and return whatever it displaced
    pub fn push(&self, key: K, value: V) -> Option<(K, V)> {
        self.inner.lock().push(key, value)
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    /// Check for a key without changing recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Run `f` with the lock held, for compound operations
    pub fn with<R>(&self, f: impl FnOnce(&mut LruCache<K, V>) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

impl<K, V> From<LruCache<K, V>> for SharedLruCache<K, V> {
    fn from(cache: LruCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}
