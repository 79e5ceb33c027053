//! Retrieved-context classification.
//!
//! Walks the evidence document depth-first carrying the property-name path
//! visited so far, then derives each leaf's structural fields from that
//! path:
//!
//! - `activity`: the nearest enclosing segment shaped like `<N>_PD` or
//!   `<N>_AE_SAE`, normalized to the bare domain tag
//! - `sub_activity`: the nearest segment carrying an `<activity_id#...>`
//!   marker, numeric prefix stripped
//! - `question`: the segment immediately after the sub-activity segment
//!   when it starts with a numeric prefix followed by a letter, prefix
//!   stripped
//!
//! A field that cannot be derived stays absent; that is a classification
//! gap, not an error. Buckets fill in traversal-discovery order; the flat
//! `chunks` view concatenates them in bucket order (PD, AE, Other).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use cairn_core::entities::{ContextChunk, ProcessedContext};
use cairn_core::enums::ChunkCategory;

use crate::document::{DocNode, RawLeaf};
use crate::registry::CategoryRegistry;

/// `<N>_PD` / `<N>_AE_SAE` activity tag segments.
static ACTIVITY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+_(PD|AE_SAE)$").expect("static pattern"));

/// Embedded sub-activity marker.
static SUB_ACTIVITY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<activity_id#[^>]*>").expect("static pattern"));

/// Numeric prefix followed by a letter, e.g. `1_What happened`.
static NUMERIC_PREFIXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+_([A-Za-z].*)$").expect("static pattern"));

/// Leading `<N>_` prefix, stripped from sub-activity segments.
static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+_").expect("static pattern"));

/// Classify a raw retrieved-context document into categorized chunks.
///
/// Deterministic: identical input graphs yield identical output (same
/// chunks, same categories, same bucket membership).
#[must_use]
pub fn classify_context(raw: &Value, registry: &CategoryRegistry) -> ProcessedContext {
    let root = DocNode::from_value(raw);

    let mut leaves = Vec::new();
    let mut path = Vec::new();
    collect_leaves(&root, &mut path, &mut leaves);

    let mut pd = Vec::new();
    let mut ae = Vec::new();
    let mut other = Vec::new();

    for (segments, leaf) in leaves {
        let chunk = build_chunk(&segments, &leaf, registry);
        match chunk.category {
            ChunkCategory::Pd => pd.push(chunk),
            ChunkCategory::Ae => ae.push(chunk),
            ChunkCategory::Other => other.push(chunk),
        }
    }

    ProcessedContext::from_buckets(pd, ae, other)
}

/// Depth-first walk. Object property names extend the path; list elements
/// and scalars do not.
fn collect_leaves(
    node: &DocNode,
    path: &mut Vec<String>,
    leaves: &mut Vec<(Vec<String>, RawLeaf)>,
) {
    match node {
        DocNode::Leaf(leaf) => leaves.push((path.clone(), leaf.clone())),
        DocNode::Map(entries) => {
            for (key, child) in entries {
                path.push(key.clone());
                collect_leaves(child, path, leaves);
                path.pop();
            }
        }
        DocNode::List(items) => {
            for child in items {
                collect_leaves(child, path, leaves);
            }
        }
        DocNode::Scalar => {}
    }
}

/// Derive structural fields, apply the metadata compatibility remap, then
/// categorize.
fn build_chunk(segments: &[String], leaf: &RawLeaf, registry: &CategoryRegistry) -> ContextChunk {
    let mut activity = derive_activity(segments).or_else(|| leaf.meta_str("activity"));
    let mut sub_activity = derive_sub_activity(segments).or_else(|| leaf.meta_str("sub_activity"));
    let mut question = derive_question(segments).or_else(|| leaf.meta_str("question"));

    remap_compat(&mut activity, &mut sub_activity, &mut question);

    let source = leaf.source();
    let category = registry.categorize(&source, &leaf.page_content);

    ContextChunk {
        text: leaf.page_content.clone(),
        source,
        category,
        activity,
        sub_activity,
        question,
    }
}

/// Nearest (leaf-most) activity tag segment, normalized to the bare tag.
fn derive_activity(segments: &[String]) -> Option<String> {
    segments.iter().rev().find_map(|segment| {
        ACTIVITY_TAG
            .captures(segment)
            .map(|caps| caps[1].to_string())
    })
}

/// Nearest segment carrying the sub-activity marker, numeric prefix
/// stripped.
fn derive_sub_activity(segments: &[String]) -> Option<String> {
    sub_activity_index(segments)
        .map(|idx| NUMERIC_PREFIX.replace(&segments[idx], "").into_owned())
}

/// The segment immediately after the sub-activity segment, when it starts
/// with a numeric prefix followed by a letter.
fn derive_question(segments: &[String]) -> Option<String> {
    let next = segments.get(sub_activity_index(segments)? + 1)?;
    NUMERIC_PREFIXED
        .captures(next)
        .map(|caps| caps[1].to_string())
}

fn sub_activity_index(segments: &[String]) -> Option<usize> {
    segments
        .iter()
        .rposition(|segment| SUB_ACTIVITY_MARKER.is_match(segment))
}

/// Compatibility remap for chunks whose structure arrived partially
/// labeled: a sub-activity with no activity shifts up, then a question with
/// no sub-activity shifts up. Idempotent: re-running on an already
/// remapped chunk changes nothing.
fn remap_compat(
    activity: &mut Option<String>,
    sub_activity: &mut Option<String>,
    question: &mut Option<String>,
) {
    if activity.is_none() && sub_activity.is_some() {
        *activity = sub_activity.take();
    }
    if sub_activity.is_none() && question.is_some() {
        *sub_activity = question.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn leaf(content: &str, source: &str) -> Value {
        json!({"page_content": content, "metadata": {"source": source}})
    }

    // ── Worked scenario ──────────────────────────────────────

    #[test]
    fn pd_leaf_with_full_structural_path() {
        let raw = json!({
            "0_PD": {
                "2_<activity_id#77>sub": {
                    "1_What happened": leaf("Protocol deviation noted", "site_report.pdf")
                }
            }
        });
        let processed = classify_context(&raw, &CategoryRegistry::default());

        assert_eq!(processed.pd.len(), 1);
        assert!(processed.ae.is_empty());
        assert!(processed.other.is_empty());

        let chunk = &processed.pd[0];
        assert_eq!(chunk.category, ChunkCategory::Pd);
        assert_eq!(chunk.text, "Protocol deviation noted");
        assert_eq!(chunk.source, "site_report.pdf");
        assert_eq!(chunk.activity.as_deref(), Some("PD"));
        assert_eq!(chunk.sub_activity.as_deref(), Some("<activity_id#77>sub"));
        assert_eq!(chunk.question.as_deref(), Some("What happened"));
    }

    // ── Structural derivation ────────────────────────────────

    #[test]
    fn nearest_activity_tag_wins() {
        let segments: Vec<String> = ["0_PD", "container", "3_AE_SAE", "leafward"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(derive_activity(&segments).as_deref(), Some("AE_SAE"));
    }

    #[test]
    fn activity_tag_requires_exact_shape() {
        let segments: Vec<String> = ["PD", "x_PD", "2_PD_extra"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(derive_activity(&segments), None);
    }

    #[test]
    fn question_requires_adjacency_and_prefix() {
        // Next segment lacks the numeric-prefix-then-letter shape.
        let segments: Vec<String> = ["1_<activity_id#9>review", "followup"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            derive_sub_activity(&segments).as_deref(),
            Some("<activity_id#9>review")
        );
        assert_eq!(derive_question(&segments), None);

        // No sub-activity segment at all: question stays underived even if
        // a numeric-prefixed segment exists.
        let segments: Vec<String> = ["0_PD", "1_What happened"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(derive_question(&segments), None);
    }

    #[test]
    fn underivable_fields_stay_absent() {
        let raw = json!({"top": {"inner": leaf("routine narrative", "summary.txt")}});
        let processed = classify_context(&raw, &CategoryRegistry::default());
        let chunk = &processed.other[0];
        assert_eq!(chunk.activity, None);
        assert_eq!(chunk.sub_activity, None);
        assert_eq!(chunk.question, None);
    }

    // ── Compatibility remap ──────────────────────────────────

    #[test]
    fn partial_labels_shift_up() {
        let mut activity = None;
        let mut sub_activity = Some("<activity_id#3>x".to_string());
        let mut question = Some("Why".to_string());

        remap_compat(&mut activity, &mut sub_activity, &mut question);

        assert_eq!(activity.as_deref(), Some("<activity_id#3>x"));
        assert_eq!(sub_activity.as_deref(), Some("Why"));
        assert_eq!(question, None);
    }

    #[test]
    fn remap_is_idempotent() {
        let mut activity = Some("PD".to_string());
        let mut sub_activity = Some("<activity_id#3>x".to_string());
        let mut question = None;

        let before = (activity.clone(), sub_activity.clone(), question.clone());
        remap_compat(&mut activity, &mut sub_activity, &mut question);
        assert_eq!((activity, sub_activity, question), before);
    }

    #[test]
    fn remap_applies_to_metadata_carried_fields() {
        // No structural path; labels arrive on the leaf metadata with the
        // activity missing.
        let raw = json!({
            "docs": [{
                "page_content": "narrative",
                "metadata": {"source": "s.txt", "sub_activity": "<activity_id#5>q", "question": "When"}
            }]
        });
        let processed = classify_context(&raw, &CategoryRegistry::default());
        let chunk = &processed.other[0];
        assert_eq!(chunk.activity.as_deref(), Some("<activity_id#5>q"));
        assert_eq!(chunk.sub_activity.as_deref(), Some("When"));
        assert_eq!(chunk.question, None);
    }

    // ── Bucketing and ordering ───────────────────────────────

    #[test]
    fn buckets_fill_in_discovery_order_and_chunks_concatenate() {
        let raw = json!({
            "a": leaf("adverse event one", "notes"),
            "b": leaf("routine", "notes"),
            "c": leaf("protocol deviation", "notes"),
            "d": leaf("AE 2 follow-up", "notes"),
        });
        let processed = classify_context(&raw, &CategoryRegistry::default());

        let ae_texts: Vec<&str> = processed.ae.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(ae_texts, ["adverse event one", "AE 2 follow-up"]);

        let flat: Vec<&str> = processed.chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(flat, ["protocol deviation", "adverse event one", "AE 2 follow-up", "routine"]);
    }

    #[test]
    fn list_elements_add_no_path_segment() {
        let raw = json!({
            "0_PD": [
                {"1_<activity_id#4>s": {"2_Q first": leaf("Protocol deviation", "r.pdf")}}
            ]
        });
        let processed = classify_context(&raw, &CategoryRegistry::default());
        let chunk = &processed.pd[0];
        assert_eq!(chunk.activity.as_deref(), Some("PD"));
        assert_eq!(chunk.sub_activity.as_deref(), Some("<activity_id#4>s"));
        assert_eq!(chunk.question.as_deref(), Some("Q first"));
    }

    #[test]
    fn classification_is_deterministic() {
        let raw = json!({
            "0_AE_SAE": {
                "1_<activity_id#2>listing": {
                    "3_Which subjects": [
                        leaf("adverse event in cohort", "ae_listing.csv"),
                        leaf("unrelated narrative", "memo.txt"),
                    ]
                }
            }
        });
        let registry = CategoryRegistry::default();
        let first = classify_context(&raw, &registry);
        let second = classify_context(&raw, &registry);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_and_scalar_documents_produce_no_chunks() {
        let registry = CategoryRegistry::default();
        assert!(classify_context(&json!({}), &registry).is_empty());
        assert!(classify_context(&json!(null), &registry).is_empty());
        assert!(classify_context(&json!("just a string"), &registry).is_empty());
    }
}
