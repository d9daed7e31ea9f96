//! Automation rule matching
//!
//! A pure, deterministic matcher used both during import staging and for
//! bulk re-application over existing transactions. Longest keyword wins
//! when several keywords are substrings of the same description; equal
//! lengths keep the original rule order (stable sort).

use crate::models::{AutomationRule, CategoryId, FlowKind};

/// Find the category for a description, if any rule matches
///
/// Only rules whose kind equals `kind` are considered. Matching is
/// case-insensitive substring containment.
pub fn match_category(
    description: &str,
    kind: FlowKind,
    rules: &[AutomationRule],
) -> Option<CategoryId> {
    let haystack = description.to_lowercase();

    let mut ordered: Vec<&AutomationRule> = rules.iter().collect();
    ordered.sort_by(|a, b| b.keyword.len().cmp(&a.keyword.len()));

    ordered
        .into_iter()
        .find(|rule| rule.kind == kind && haystack.contains(&rule.keyword.to_lowercase()))
        .map(|rule| rule.category_id)
}
