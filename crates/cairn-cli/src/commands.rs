//! Command handlers.

use std::time::Duration;

use serde::Serialize;

use cairn_cache::TieredCache;
use cairn_client::{ArtifactFetcher, ReviewClient};
use cairn_config::CairnConfig;
use cairn_core::entities::{FindingsBundle, ProcessedContext};

use crate::cli::OutputFormat;
use crate::output;

/// `cairn jobs`: print the roster, most recent first.
pub async fn jobs(config: &CairnConfig, format: OutputFormat) -> anyhow::Result<()> {
    let client = runner_client(config);
    let jobs = client.list_jobs().await?;
    output::output(&jobs, format)
}

/// `cairn show <job-id>`: fetch one job's artifacts and print the bundle,
/// partial results included.
pub async fn show(config: &CairnConfig, job_id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let cache = TieredCache::new(config.cache.resolved_dir());
    let ttl = Duration::from_secs(config.cache.ttl_days * 24 * 60 * 60);
    let fetcher = ArtifactFetcher::new(runner_client(config), cache, ttl);

    let outcome = fetcher.fetch(job_id).await;
    let response = ShowResponse {
        job_id: job_id.to_string(),
        from_cache: outcome.from_cache,
        ai_messages: outcome.artifacts.ai_messages,
        findings: outcome.artifacts.findings,
        retrieved_context: outcome.artifacts.retrieved_context,
        message_error: outcome.message_error,
        context_error: outcome.context_error,
    };
    output::output(&response, format)
}

fn runner_client(config: &CairnConfig) -> ReviewClient {
    ReviewClient::new(
        config.api.base_url_trimmed(),
        Duration::from_secs(config.api.timeout_secs),
    )
}

/// Flattened artifact bundle with its per-artifact error states.
#[derive(Debug, Serialize)]
struct ShowResponse {
    job_id: String,
    from_cache: bool,
    ai_messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    findings: Option<FindingsBundle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retrieved_context: Option<ProcessedContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_error: Option<String>,
}
