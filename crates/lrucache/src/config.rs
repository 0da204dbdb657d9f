//! Cache configuration
//!
//! Capacity is the only knob. It is validated once, when a [`Capacity`] is
//! built, so every constructed cache holds a positive bound.

use std::num::NonZeroUsize;

use crate::error::{Error, Result};

/// Maximum number of entries a cache may hold. Always greater than 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capacity(NonZeroUsize);

impl Capacity {
    /// Capacity as a plain `usize`
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for Capacity {
    type Error = Error;

    fn try_from(n: usize) -> Result<Self> {
        NonZeroUsize::new(n)
            .map(Capacity)
            .ok_or(Error::InvalidCapacity(0))
    }
}

impl TryFrom<i64> for Capacity {
    type Error = Error;

    fn try_from(n: i64) -> Result<Self> {
        if n <= 0 {
            return Err(Error::InvalidCapacity(n));
        }
        // Saturate on targets where i64 exceeds usize.
        let n = usize::try_from(n).unwrap_or(usize::MAX);
        Capacity::try_from(n)
    }
}

impl From<NonZeroUsize> for Capacity {
    fn from(n: NonZeroUsize) -> Self {
        Self(n)
    }
}

/// Construction options for [`LruCache`](crate::LruCache)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub capacity: Capacity,
}

impl CacheConfig {
    /// Build a config from a raw capacity, rejecting values <= 0
    ///
    /// # Arguments
    /// * `capacity` - Requested maximum number of entries
    ///
    /// # Returns
    /// * `Result<CacheConfig>` - Validated configuration
    pub fn new(capacity: i64) -> Result<Self> {
        Ok(Self {
            capacity: Capacity::try_from(capacity)?,
        })
    }
}

impl From<Capacity> for CacheConfig {
    fn from(capacity: Capacity) -> Self {
        Self { capacity }
    }
}
