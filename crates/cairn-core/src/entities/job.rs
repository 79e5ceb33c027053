use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::JobStatus;

/// One analysis job from the runner's roster. Immutable once fetched;
/// identity is `id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub trial_id: String,
    pub site_id: String,
    /// Preformatted date-range label from the runner, carried verbatim.
    pub date_range: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
