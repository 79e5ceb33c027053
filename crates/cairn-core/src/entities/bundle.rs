use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{FindingsBundle, ProcessedContext};

/// Everything retrieved for one job: assistant messages plus the classified
/// findings and context. Owned by the review session once retrieved and
/// rebuilt from cache or network on every job selection.
///
/// `findings` and `retrieved_context` are `None` when that artifact's fetch
/// failed or has not completed; the absent side carries its own error state
/// at the fetch layer so partial results stay visible.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct JobArtifactBundle {
    pub ai_messages: Vec<String>,
    pub findings: Option<FindingsBundle>,
    pub retrieved_context: Option<ProcessedContext>,
}

impl JobArtifactBundle {
    /// Whether any artifact has been retrieved at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ai_messages.is_empty() && self.findings.is_none() && self.retrieved_context.is_none()
    }
}
