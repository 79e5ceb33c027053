//! Findings bucketing.
//!
//! The job runner reports findings as a flat map of named entries, each
//! carrying a `conclusion` and optionally a supporting `table`. Bucketing
//! is by key-name substring, case-insensitive, PD tested before AE. The
//! precedence for keys matching both domains is an observed contract, not
//! a documented one, and is preserved as-is. Keys matching neither domain
//! are dropped (a classification gap, not an error).

use serde_json::Value;

use cairn_core::entities::{Finding, FindingsBundle, Row};

/// Partition raw findings into the PD / AE buckets.
///
/// Entries without a `conclusion` string are skipped entirely.
#[must_use]
pub fn classify_findings(raw: &serde_json::Map<String, Value>) -> FindingsBundle {
    let mut bundle = FindingsBundle::default();

    for (key, entry) in raw {
        let Some(conclusion) = entry.get("conclusion").and_then(Value::as_str) else {
            continue;
        };

        let finding = Finding {
            id: key.clone(),
            content: conclusion.to_string(),
            table: table_rows(entry),
        };

        let key_lc = key.to_lowercase();
        if key_lc.contains("pd") {
            bundle.pd.push(finding);
        } else if key_lc.contains("ae") {
            bundle.ae.push(finding);
        }
    }

    bundle
}

/// The entry's `table` as rows, empty when absent or not an array.
fn table_rows(entry: &Value) -> Vec<Row> {
    entry
        .get("table")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .filter_map(Value::as_object)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}
