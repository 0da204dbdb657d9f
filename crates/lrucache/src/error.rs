//! Error types for lrucache

use std::fmt;

/// Result type alias for lrucache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction
///
/// Lookups never fail: a missing key is `None`, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Capacity was zero or negative
    InvalidCapacity(i64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(n) => {
                write!(f, "Invalid capacity: {} (must be greater than 0)", n)
            }
        }
    }
}

impl std::error::Error for Error {}
