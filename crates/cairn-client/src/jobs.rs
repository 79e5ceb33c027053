//! Job roster fetch.
//!
//! The roster is never cached: every call reflects the runner's latest
//! state. Ordering is strict, `created_at` descending, ties broken by the
//! runner's original response order (stable sort).

use chrono::{DateTime, Utc};

use cairn_core::entities::Job;
use cairn_core::enums::JobStatus;

use crate::{ReviewClient, error::ClientError, http::check_response};

#[derive(serde::Deserialize)]
struct JobsResponse {
    jobs: Vec<JobRow>,
}

/// One roster row as the runner reports it.
#[derive(serde::Deserialize)]
struct JobRow {
    job_id: String,
    status: JobStatus,
    run_at: DateTime<Utc>,
    completed_time: Option<DateTime<Utc>>,
    trial_id: String,
    site_id: String,
    date: String,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.job_id,
            trial_id: row.trial_id,
            site_id: row.site_id,
            date_range: row.date,
            status: row.status,
            created_at: row.run_at,
            completed_at: row.completed_time,
        }
    }
}

impl ReviewClient {
    /// Fetch the job roster, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the HTTP request fails, the runner
    /// returns a non-success status, or the response cannot be parsed.
    pub async fn list_jobs(&self) -> Result<Vec<Job>, ClientError> {
        let resp = check_response(self.http.get(self.url("/jobs")).send().await?).await?;
        let data: JobsResponse = resp.json().await?;
        Ok(roster_from_rows(data.jobs))
    }
}

/// Map wire rows into jobs and apply the roster ordering.
fn roster_from_rows(rows: Vec<JobRow>) -> Vec<Job> {
    let mut jobs: Vec<Job> = rows.into_iter().map(Job::from).collect();
    // Stable: equal timestamps keep the runner's response order.
    jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    jobs
}
