//! Time-boxed cache entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached value with the instant it was written.
///
/// Lifecycle: created on successful fetch, read on cache hit, superseded by
/// a fresh write on expiry-triggered refetch. Entries are never explicitly
/// deleted; expired ones are bypassed until overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    /// Write instant, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Wrap a freshly fetched value, stamped with the current instant.
    pub fn new(value: T) -> Self {
        Self {
            value,
            timestamp: Utc::now(),
        }
    }

    /// Wrap a value with an explicit write instant.
    pub const fn with_timestamp(value: T, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }

    /// Whether the entry is still fresh: `now - timestamp <= ttl`.
    ///
    /// An expired entry is treated identically to an absent one by the
    /// cache; it is bypassed, not deleted.
    #[must_use]
    pub fn is_valid(&self, ttl: Duration) -> bool {
        let age_ms = Utc::now()
            .signed_duration_since(self.timestamp)
            .num_milliseconds();
        age_ms <= i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
    }
}
