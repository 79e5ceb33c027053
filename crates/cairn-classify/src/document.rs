//! Typed view over the retrieved-context document graph.
//!
//! The upstream service returns an arbitrarily nested JSON graph. Rather
//! than inferring leaf-ness from ad hoc field presence at every traversal
//! site, the graph is converted once into a tagged model: a node carrying
//! both a `page_content` string and a `metadata` object is a [`RawLeaf`];
//! everything else is a container or an ignorable scalar. Traversal never
//! descends past a leaf.

use serde_json::Value;

/// An evidence leaf as it appears on the wire: content plus its metadata
/// object (source document, optional structural hints).
#[derive(Debug, Clone, PartialEq)]
pub struct RawLeaf {
    pub page_content: String,
    pub metadata: serde_json::Map<String, Value>,
}

impl RawLeaf {
    /// The `source` metadata field, empty when the upstream omitted it.
    #[must_use]
    pub fn source(&self) -> String {
        self.metadata
            .get("source")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// A string-valued metadata field, if present and non-empty.
    #[must_use]
    pub fn meta_str(&self, key: &str) -> Option<String> {
        self.metadata
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Tagged document node: leaf chunk, named container, list, or scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    /// A chunk of evidence text; traversal stops here.
    Leaf(RawLeaf),
    /// Object container: children keyed by property name. The property
    /// names are the path segments structural metadata is derived from.
    Map(Vec<(String, DocNode)>),
    /// Array container: elements contribute no path segment.
    List(Vec<DocNode>),
    /// Anything else (string, number, bool, null); carries no evidence.
    Scalar,
}

impl DocNode {
    /// Convert a raw JSON value into the tagged model.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                if let Some(leaf) = leaf_from_object(map) {
                    return Self::Leaf(leaf);
                }
                Self::Map(
                    map.iter()
                        .map(|(key, child)| (key.clone(), Self::from_value(child)))
                        .collect(),
                )
            }
            Value::Array(items) => Self::List(items.iter().map(Self::from_value).collect()),
            _ => Self::Scalar,
        }
    }
}

/// Leaf detection: an object with both a `page_content` string and a
/// `metadata` object.
fn leaf_from_object(map: &serde_json::Map<String, Value>) -> Option<RawLeaf> {
    let page_content = map.get("page_content")?.as_str()?;
    let metadata = map.get("metadata")?.as_object()?;
    Some(RawLeaf {
        page_content: page_content.to_string(),
        metadata: metadata.clone(),
    })
}
