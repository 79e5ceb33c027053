//! Review session facade with a stale-selection guard.
//!
//! Selecting a different job while a fetch is in flight does not cancel
//! the request; its result is still written to the cache for the job id
//! it was issued for (harmless, and useful later). What it must never do
//! is overwrite the view of the job the user has since selected. Each
//! selection advances a generation counter; fetches carry the token they
//! were issued under and results from a superseded token are discarded.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::artifacts::{ArtifactFetchOutcome, ArtifactFetcher};

/// Tags one in-flight fetch with the selection it was issued for.
#[derive(Debug, Clone)]
pub struct SelectionToken {
    job_id: String,
    generation: u64,
}

impl SelectionToken {
    #[must_use]
    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

/// One user's review session: the artifact fetcher plus the currently
/// selected job.
pub struct ReviewSession {
    fetcher: ArtifactFetcher,
    generation: AtomicU64,
}

impl ReviewSession {
    #[must_use]
    pub fn new(fetcher: ArtifactFetcher) -> Self {
        Self {
            fetcher,
            generation: AtomicU64::new(0),
        }
    }

    /// Record a new job selection, superseding every earlier token.
    pub fn select(&self, job_id: &str) -> SelectionToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SelectionToken {
            job_id: job_id.to_string(),
            generation,
        }
    }

    /// Whether `token` still names the current selection.
    #[must_use]
    pub fn is_current(&self, token: &SelectionToken) -> bool {
        token.generation == self.generation.load(Ordering::SeqCst)
    }

    /// Fetch artifacts for the selection named by `token`.
    ///
    /// The fetch runs to completion and its result is cached for the
    /// token's job id regardless; `None` is returned when the selection
    /// has moved on, so a stale response can never reach the current view.
    pub async fn fetch_selected(&self, token: &SelectionToken) -> Option<ArtifactFetchOutcome> {
        let outcome = self.fetcher.fetch(token.job_id()).await;
        self.is_current(token).then_some(outcome)
    }

    /// Direct access to the fetcher, for callers that manage their own
    /// selection state.
    #[must_use]
    pub fn fetcher(&self) -> &ArtifactFetcher {
        &self.fetcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_selection_supersedes_older_tokens() {
        let session = stub_session();
        let first = session.select("job-1");
        assert!(session.is_current(&first));

        let second = session.select("job-2");
        assert!(!session.is_current(&first));
        assert!(session.is_current(&second));
    }

    #[test]
    fn reselecting_the_same_job_still_advances() {
        let session = stub_session();
        let first = session.select("job-1");
        let second = session.select("job-1");
        assert!(!session.is_current(&first));
        assert!(session.is_current(&second));
        assert_eq!(second.job_id(), "job-1");
    }

    fn stub_session() -> ReviewSession {
        use crate::ReviewClient;
        use cairn_cache::TieredCache;
        use std::time::Duration;

        let dir = std::env::temp_dir().join("cairn-session-test-cache");
        let fetcher = ArtifactFetcher::new(
            ReviewClient::new("http://localhost:0", Duration::from_secs(1)),
            TieredCache::new(dir),
            Duration::from_secs(60),
        );
        ReviewSession::new(fetcher)
    }
}
