use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One tabular row attached to a finding, kept schemaless since table
/// shapes vary per analysis activity.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A named conclusion produced by the analysis job, with its supporting
/// table rows.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Finding {
    /// Original key under which the job runner reported this finding.
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub table: Vec<Row>,
}

/// Findings partitioned into the two audit domains.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FindingsBundle {
    pub pd: Vec<Finding>,
    pub ae: Vec<Finding>,
}

impl FindingsBundle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pd.is_empty() && self.ae.is_empty()
    }
}
