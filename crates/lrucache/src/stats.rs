//! Access counters for [`LruCache`](crate::LruCache)
//!
//! `peek` and `contains` are not counted; only `get`, `get_mut`, `put` and
//! evictions move these numbers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hit/miss/eviction counters for a cache
///
/// Counters are atomic so a shared cache can hand out `&CacheStats`
/// without holding its lock.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    updates: AtomicU64,
    evictions: AtomicU64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl CacheStats {
    /// All counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// A `get` found its key
    pub fn record_hit(&self) {
        bump(&self.hits);
    }

    /// A `get` found nothing
    pub fn record_miss(&self) {
        bump(&self.misses);
    }

    /// A `put` added a key that was not present
    pub fn record_insert(&self) {
        bump(&self.inserts);
    }

    /// A `put` replaced the value of a present key
    pub fn record_update(&self) {
        bump(&self.updates);
    }

    /// The least recently used entry was dropped to make room
    pub fn record_eviction(&self) {
        bump(&self.evictions);
    }

    /// Lookups that found their key
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that found nothing
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// New keys stored
    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Values replaced in place
    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    /// Entries pushed out by capacity
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Share of lookups that hit, in `0.0..=1.0`; 0 before any lookup
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits() + self.misses();
        match lookups {
            0 => 0.0,
            n => self.hits() as f64 / n as f64,
        }
    }

    /// Zero every counter
    pub fn reset(&self) {
        for counter in [
            &self.hits,
            &self.misses,
            &self.inserts,
            &self.updates,
            &self.evictions,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
