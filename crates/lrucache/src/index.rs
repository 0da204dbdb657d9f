//! Key index: O(1) map from key to recency-list node

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

use crate::list::NodeId;

/// Hash map from key to the node holding that key's entry
pub(crate) struct Index<K> {
    map: HashMap<K, NodeId, RandomState>,
}

impl<K: Hash + Eq> Index<K> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    pub(crate) fn lookup<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).copied()
    }

    /// Install or overwrite the handle for `key`
    pub(crate) fn insert(&mut self, key: K, id: NodeId) {
        self.map.insert(key, id);
    }

    /// Delete the mapping for `key`; absent keys are ignored
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}
