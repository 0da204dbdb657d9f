//! # lrucache
//!
//! Fixed-capacity key-value cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **Index**: AHash map from key to node handle (O(1))
//! - **Recency list**: arena-backed doubly-linked list with head/tail
//!   sentinels, LRU at the head end, MRU at the tail end (O(1))
//! - **LruCache**: keeps both in step on every `get`/`put`
//! - **SharedLruCache**: one `parking_lot` mutex around the whole cache

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod index;
mod list;
mod stats;
mod sync;

pub use cache::LruCache;
pub use config::{CacheConfig, Capacity};
pub use error::{Error, Result};
pub use list::Iter;
pub use stats::CacheStats;
pub use sync::SharedLruCache;
