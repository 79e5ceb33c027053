//! # cairn-cache
//!
//! Tiered cache for job artifacts: an in-process map in front of a durable
//! file tier, with cache-aside semantics and time-boxed entries.
//!
//! Policy, in one place: caching is an optimization, not a correctness
//! dependency. Every tier failure (IO error, corrupt payload, serialization
//! error) is caught here, logged via `tracing::warn!`, and treated as a
//! miss on reads or a no-op on writes. Callers never see a cache error.
//!
//! Expired entries are bypassed, not deleted; a subsequent [`TieredCache::put`]
//! overwrites them. The durable tier is shared across processes with
//! last-write-wins consistency.

mod backend;
mod entry;
mod error;

pub use backend::{CacheBackend, FileBackend, MemoryBackend};
pub use entry::CacheEntry;
pub use error::CacheError;

use serde::{Serialize, de::DeserializeOwned};
use std::path::PathBuf;
use std::time::Duration;

/// Default entry time-to-live: 7 days.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Two cache tiers queried in order: memory first, then the durable tier.
///
/// Writes go through to both tiers; from the caller's perspective a `put`
/// is one operation (no partial-write visibility is guaranteed across
/// tiers). A durable-tier hit is promoted into the memory tier so repeat
/// reads stay in-process.
#[derive(Debug)]
pub struct TieredCache<D: CacheBackend = FileBackend> {
    memory: MemoryBackend,
    durable: D,
}

impl TieredCache<FileBackend> {
    /// Tiered cache with a file-backed durable tier rooted at `dir`.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self::with_durable(FileBackend::new(dir))
    }
}

impl<D: CacheBackend> TieredCache<D> {
    /// Tiered cache over an explicit durable backend.
    pub fn with_durable(durable: D) -> Self {
        Self {
            memory: MemoryBackend::new(),
            durable,
        }
    }

    /// Look up `key`, memory tier first. Returns the stored entry with its
    /// write timestamp; freshness is the caller's call via
    /// [`CacheEntry::is_valid`].
    ///
    /// Tier failures and corrupt payloads degrade to `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        if let Some(payload) = self.read_tier(&self.memory, key).await
            && let Some(entry) = parse_payload(self.memory.name(), key, &payload)
        {
            return Some(entry);
        }
        let payload = self.read_tier(&self.durable, key).await?;
        let entry = parse_payload(self.durable.name(), key, &payload)?;
        // Promote so repeat reads skip the durable tier.
        self.write_tier(&self.memory, key, &payload).await;
        Some(entry)
    }

    /// Store `value` under `key` in both tiers, stamped with the current
    /// instant. Overwrites any previous entry, expired or not.
    ///
    /// Tier failures degrade to a no-op for that tier.
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) {
        let entry = CacheEntry::new(value);
        let payload = match serde_json::to_string(&entry) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(key, %error, "cache entry not serializable, skipping write");
                return;
            }
        };
        self.write_tier(&self.memory, key, &payload).await;
        self.write_tier(&self.durable, key, &payload).await;
    }

    /// Read one tier, reducing every failure mode to a miss.
    async fn read_tier(&self, tier: &impl CacheBackend, key: &str) -> Option<String> {
        match tier.read(key).await {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(tier = tier.name(), key, %error, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Write one tier, reducing every failure mode to a no-op.
    async fn write_tier(&self, tier: &impl CacheBackend, key: &str, payload: &str) {
        if let Err(error) = tier.write(key, payload).await {
            tracing::warn!(tier = tier.name(), key, %error, "cache write failed, skipping tier");
        }
    }
}

/// Parse a stored payload, reducing corruption to a miss.
fn parse_payload<T: DeserializeOwned>(tier: &str, key: &str, payload: &str) -> Option<CacheEntry<T>> {
    match serde_json::from_str(payload) {
        Ok(entry) => Some(entry),
        Err(error) => {
            tracing::warn!(tier, key, %error, "corrupt cache payload, treating as miss");
            None
        }
    }
}
