use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ChunkCategory;

/// One unit of retrieved evidence text with its source metadata and the
/// structural fields derived from where it sat in the document graph.
///
/// Produced only by the context classifier; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ContextChunk {
    pub text: String,
    pub source: String,
    pub category: ChunkCategory,
    /// Domain tag of the enclosing activity (`PD` or `AE_SAE`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

/// Classified context chunks partitioned by category.
///
/// `chunks` is the concatenation `pd ++ ae ++ other`, preserved for
/// consumers that predate the partitioned view. Every chunk in `chunks`
/// appears in exactly one bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProcessedContext {
    pub pd: Vec<ContextChunk>,
    pub ae: Vec<ContextChunk>,
    pub other: Vec<ContextChunk>,
    pub chunks: Vec<ContextChunk>,
}

impl ProcessedContext {
    /// Assemble from per-category buckets, deriving the flat `chunks` view
    /// in bucket order (PD, then AE, then Other).
    #[must_use]
    pub fn from_buckets(
        pd: Vec<ContextChunk>,
        ae: Vec<ContextChunk>,
        other: Vec<ContextChunk>,
    ) -> Self {
        let mut chunks = Vec::with_capacity(pd.len() + ae.len() + other.len());
        chunks.extend(pd.iter().cloned());
        chunks.extend(ae.iter().cloned());
        chunks.extend(other.iter().cloned());
        Self {
            pd,
            ae,
            other,
            chunks,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, category: ChunkCategory) -> ContextChunk {
        ContextChunk {
            text: text.to_string(),
            source: "doc.pdf".to_string(),
            category,
            activity: None,
            sub_activity: None,
            question: None,
        }
    }

    #[test]
    fn flat_view_is_bucket_concatenation() {
        let processed = ProcessedContext::from_buckets(
            vec![chunk("p1", ChunkCategory::Pd)],
            vec![chunk("a1", ChunkCategory::Ae), chunk("a2", ChunkCategory::Ae)],
            vec![chunk("o1", ChunkCategory::Other)],
        );

        let texts: Vec<&str> = processed.chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["p1", "a1", "a2", "o1"]);
        assert_eq!(
            processed.chunks.len(),
            processed.pd.len() + processed.ae.len() + processed.other.len()
        );
    }

    #[test]
    fn optional_fields_omitted_from_json() {
        let json = serde_json::to_value(chunk("x", ChunkCategory::Other)).unwrap();
        assert!(json.get("activity").is_none());
        assert!(json.get("question").is_none());
    }
}
