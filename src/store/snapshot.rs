//! Serializable snapshot of the full book state
//!
//! The snapshot is the single JSON document used for both the live data
//! file and backups. Field names are fixed by the on-disk format and must
//! not change without a corresponding migration step.

use serde::{Deserialize, Serialize};

use crate::models::{default_categories, Account, AutomationRule, Category, Goal, Transaction};

/// Current version of the persisted data structure
pub const DATA_STRUCTURE_VERSION: u32 = 2;

/// Complete book state as persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// All transactions across all accounts
    #[serde(rename = "allTransactions")]
    pub transactions: Vec<Transaction>,
    /// All categories, sinks included
    pub categories: Vec<Category>,
    /// Savings goals
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// Bank accounts
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Keyword-based categorization rules
    #[serde(rename = "automationRules", default)]
    pub rules: Vec<AutomationRule>,
    /// Schema version of this document
    #[serde(rename = "dataStructureVersion")]
    pub version: u32,
}

impl BookSnapshot {
    /// Snapshot for a brand new book: no data, default category tree
    pub fn fresh() -> Self {
        Self {
            transactions: Vec::new(),
            categories: default_categories(),
            goals: Vec::new(),
            accounts: Vec::new(),
            rules: Vec::new(),
            version: DATA_STRUCTURE_VERSION,
        }
    }
}

impl Default for BookSnapshot {
    fn default() -> Self {
        Self::fresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EXPENSE_SINK_ID, INCOME_SINK_ID};

    #[test]
    fn test_fresh_snapshot_has_sinks() {
        let snapshot = BookSnapshot::fresh();
        assert_eq!(snapshot.version, DATA_STRUCTURE_VERSION);
        assert!(snapshot.categories.iter().any(|c| c.id == EXPENSE_SINK_ID));
        assert!(snapshot.categories.iter().any(|c| c.id == INCOME_SINK_ID));
        assert!(snapshot.transactions.is_empty());
    }

    #[test]
    fn test_wire_field_names() {
        let snapshot = BookSnapshot::fresh();
        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value.get("allTransactions").is_some());
        assert!(value.get("categories").is_some());
        assert!(value.get("automationRules").is_some());
        assert_eq!(value["dataStructureVersion"], DATA_STRUCTURE_VERSION);
    }

    #[test]
    fn test_missing_optional_collections_default_empty() {
        let raw = serde_json::json!({
            "allTransactions": [],
            "categories": [],
            "dataStructureVersion": 2
        });
        let snapshot: BookSnapshot = serde_json::from_value(raw).unwrap();
        assert!(snapshot.accounts.is_empty());
        assert!(snapshot.goals.is_empty());
        assert!(snapshot.rules.is_empty());
    }
}
