//! Category heuristics as an explicit, caller-owned registry.
//!
//! The rules live in a value passed by reference through the classifier
//! rather than in module-level mutable state, so callers can extend the
//! roster (new phrases or patterns routing into a category) per
//! configuration without affecting anyone else. Rule order is precedence
//! order: the first matching rule wins, and the default roster tests PD
//! before AE, so content matching both domains lands in PD.

use cairn_core::enums::ChunkCategory;
use regex::Regex;

/// One category heuristic: matches on the chunk's source name or content.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: ChunkCategory,
    /// Substring looked up in the lower-cased source name.
    pub source_needle: String,
    /// Substrings looked up in the lower-cased content.
    pub content_phrases: Vec<String>,
    /// Pattern matched against the lower-cased content.
    pub content_pattern: Option<Regex>,
}

impl CategoryRule {
    /// Whether this rule claims a chunk. `source_lc` and `content_lc` must
    /// already be lower-cased.
    #[must_use]
    pub fn matches(&self, source_lc: &str, content_lc: &str) -> bool {
        if !self.source_needle.is_empty() && source_lc.contains(&self.source_needle) {
            return true;
        }
        if self
            .content_phrases
            .iter()
            .any(|phrase| content_lc.contains(phrase.as_str()))
        {
            return true;
        }
        self.content_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(content_lc))
    }
}

/// Ordered roster of category rules with an `Other` fallback.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    rules: Vec<CategoryRule>,
}

impl Default for CategoryRegistry {
    /// The built-in roster: PD first, then AE. Precedence is part of the
    /// observed contract, do not reorder.
    fn default() -> Self {
        let pd = CategoryRule {
            category: ChunkCategory::Pd,
            source_needle: "pd".to_string(),
            content_phrases: vec!["protocol deviation".to_string(), "pd_".to_string()],
            content_pattern: Some(Regex::new(r"pd \d+").expect("static pattern")),
        };
        let ae = CategoryRule {
            category: ChunkCategory::Ae,
            source_needle: "ae".to_string(),
            content_phrases: vec!["adverse event".to_string(), "ae_".to_string()],
            content_pattern: Some(Regex::new(r"ae \d+").expect("static pattern")),
        };
        Self {
            rules: vec![pd, ae],
        }
    }
}

impl CategoryRegistry {
    /// Append a rule after the existing roster (still ahead of the `Other`
    /// fallback).
    pub fn register(&mut self, rule: CategoryRule) {
        self.rules.push(rule);
    }

    /// First matching rule wins; no match falls back to `Other`.
    #[must_use]
    pub fn categorize(&self, source: &str, content: &str) -> ChunkCategory {
        let source_lc = source.to_lowercase();
        let content_lc = content.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&source_lc, &content_lc))
            .map_or(ChunkCategory::Other, |rule| rule.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CategoryRegistry {
        CategoryRegistry::default()
    }

    #[test]
    fn pd_by_source_substring() {
        assert_eq!(
            registry().categorize("site_report.pdf", "nothing relevant"),
            ChunkCategory::Pd
        );
    }

    #[test]
    fn pd_by_content_phrase_and_pattern() {
        let r = registry();
        assert_eq!(r.categorize("notes", "A Protocol Deviation was logged"), ChunkCategory::Pd);
        assert_eq!(r.categorize("notes", "see PD_visit_3"), ChunkCategory::Pd);
        assert_eq!(r.categorize("notes", "recorded as PD 12"), ChunkCategory::Pd);
    }

    #[test]
    fn ae_by_source_and_content() {
        let r = registry();
        assert_eq!(r.categorize("ae_listing.csv", "rows"), ChunkCategory::Ae);
        assert_eq!(r.categorize("notes", "an adverse event occurred"), ChunkCategory::Ae);
        assert_eq!(r.categorize("notes", "AE 7 resolved"), ChunkCategory::Ae);
    }

    #[test]
    fn no_match_is_other() {
        assert_eq!(
            registry().categorize("summary.txt", "routine visit"),
            ChunkCategory::Other
        );
    }

    #[test]
    fn both_domains_resolve_to_pd() {
        // Precedence artifact preserved as-is: PD is tested first.
        assert_eq!(
            registry().categorize("paed_notes", "adverse event after pd 3"),
            ChunkCategory::Pd
        );
    }

    #[test]
    fn registered_rule_extends_the_roster() {
        let mut r = registry();
        r.register(CategoryRule {
            category: ChunkCategory::Ae,
            source_needle: "sae".to_string(),
            content_phrases: vec!["serious event".to_string()],
            content_pattern: None,
        });
        assert_eq!(r.categorize("notes", "a serious event occurred"), ChunkCategory::Ae);
        // Existing precedence untouched.
        assert_eq!(r.categorize("site.pdf", "serious event"), ChunkCategory::Pd);
    }
}
