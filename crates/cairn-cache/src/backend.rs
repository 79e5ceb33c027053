//! Cache tier backends.
//!
//! A backend stores opaque string payloads under string keys. The tiered
//! cache layers two of them: [`MemoryBackend`] (fast, process-lifetime) and
//! [`FileBackend`] (durable, one JSON file per key). Backends report their
//! failures; the tier above decides what to do with them.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::CacheError;

/// One cache tier: read and write opaque payloads by key.
pub trait CacheBackend {
    /// Short tier name for log lines.
    fn name(&self) -> &'static str;

    /// Read the payload stored under `key`, if any.
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>, CacheError>> + Send;

    /// Store `payload` under `key`, overwriting any previous payload.
    fn write(&self, key: &str, payload: &str) -> impl Future<Output = Result<(), CacheError>> + Send;
}

// ── Memory tier ────────────────────────────────────────────────────

/// In-process map tier. Never persists across restarts.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.lock().expect("memory tier lock poisoned");
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, payload: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().expect("memory tier lock poisoned");
        entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

// ── Durable file tier ──────────────────────────────────────────────

/// Durable tier: one JSON file per key under a cache directory.
///
/// Shared across processes; writes are not transactional across them, so
/// last-write-wins is the consistency model. Writes go through a tmp file
/// and rename so readers never observe a half-written payload.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", safe_component(key)))
    }
}

impl CacheBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(payload) => Ok(Some(payload)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(CacheError::Io(error)),
        }
    }

    async fn write(&self, key: &str, payload: &str) -> Result<(), CacheError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, payload).await?;
        if let Err(error) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CacheError::Io(error));
        }
        Ok(())
    }
}

/// Map an arbitrary cache key to a filesystem-safe file stem.
fn safe_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() { "_".to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_roundtrip() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read("k").await.unwrap(), None);
        backend.write("k", "v1").await.unwrap();
        assert_eq!(backend.read("k").await.unwrap().as_deref(), Some("v1"));
        backend.write("k", "v2").await.unwrap();
        assert_eq!(backend.read("k").await.unwrap().as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().to_path_buf());
        assert_eq!(backend.read("cairn:job:42").await.unwrap(), None);
        backend.write("cairn:job:42", r#"{"a":1}"#).await.unwrap();
        assert_eq!(
            backend.read("cairn:job:42").await.unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
    }

    #[tokio::test]
    async fn file_write_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nested").join("deeper"));
        backend.write("k", "v").await.unwrap();
        assert_eq!(backend.read("k").await.unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn keys_map_to_safe_filenames() {
        assert_eq!(safe_component("cairn:job-artifacts:42"), "cairn_job-artifacts_42");
        assert_eq!(safe_component("a/b\\c"), "a_b_c");
        assert_eq!(safe_component(""), "_");
    }
}
