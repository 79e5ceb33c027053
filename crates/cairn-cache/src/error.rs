//! Cache error types.
//!
//! These errors never reach callers of [`crate::TieredCache`]: the cache
//! swallows and logs them, degrading to a miss. They exist so the backends
//! can report precisely what went wrong to the tier that logs it.

use thiserror::Error;

/// Errors from a single cache backend operation.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem read/write failed (permissions, quota, missing dir).
    #[error("cache IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored payload or a value being stored could not be (de)serialized.
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
