//! # cairn-client
//!
//! HTTP clients for the upstream analysis job runner, plus the fetch
//! orchestration that feeds the tiered cache:
//!
//! - [`ReviewClient`]: thin wrapper over a shared `reqwest::Client`; the
//!   roster fetch ([`ReviewClient::list_jobs`]) lives here.
//! - [`ArtifactFetcher`]: cache-aside retrieval of a job's artifacts.
//!   Messages/findings and retrieved context are fetched independently,
//!   classified, and written back as one record per job id.
//! - [`ReviewSession`]: the facade the UI drives; tags in-flight fetches
//!   with the selection they were issued for and discards stale results.

mod artifacts;
mod error;
mod http;
mod jobs;
mod session;

pub use artifacts::{ArtifactFetchOutcome, ArtifactFetcher};
pub use error::ClientError;
pub use session::{ReviewSession, SelectionToken};

use std::time::Duration;

/// HTTP client for the job runner API.
#[derive(Debug, Clone)]
pub struct ReviewClient {
    http: reqwest::Client,
    base_url: String,
}

impl ReviewClient {
    /// Create a client for the runner at `base_url` (no trailing slash
    /// required) with the given per-request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("cairn/0.1")
                .timeout(timeout)
                .build()
                .expect("reqwest client should build"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL with no trailing slash, for path joining.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
