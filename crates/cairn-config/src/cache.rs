//! Artifact cache settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the durable cache tier writes and how long entries stay fresh.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheSettings {
    /// Directory for the durable tier. Empty string means "use the
    /// platform cache directory" (`~/.cache/cairn` on Linux).
    pub dir: String,
    /// Entry time-to-live in days.
    pub ttl_days: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: String::new(),
            ttl_days: 7,
        }
    }
}

impl CacheSettings {
    /// Resolve the durable-tier directory, falling back to the platform
    /// cache dir and finally to a relative `.cairn/cache`.
    #[must_use]
    pub fn resolved_dir(&self) -> PathBuf {
        if !self.dir.is_empty() {
            return PathBuf::from(&self.dir);
        }
        dirs::cache_dir().map_or_else(
            || PathBuf::from(".cairn/cache"),
            |base| base.join("cairn"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let settings = CacheSettings {
            dir: "/tmp/cairn-test".to_string(),
            ttl_days: 7,
        };
        assert_eq!(settings.resolved_dir(), PathBuf::from("/tmp/cairn-test"));
    }

    #[test]
    fn default_ttl_is_seven_days() {
        assert_eq!(CacheSettings::default().ttl_days, 7);
    }
}
