//! Category model
//!
//! Categories form a shallow tree (one optional parent level per node) and
//! are typed by flow direction. Two reserved sink categories absorb
//! transactions that have no explicit or rule-derived category; they exist
//! in every book and cannot be deleted.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::{uuid, Uuid};

use super::ids::CategoryId;
use super::transaction::FlowKind;

/// Fixed identifier of the reserved "Uncategorized" expense sink
pub const EXPENSE_SINK_UUID: Uuid = uuid!("00000000-0000-4000-8000-00000000e095");

/// Fixed identifier of the reserved "Various Income" income sink
pub const INCOME_SINK_UUID: Uuid = uuid!("00000000-0000-4000-8000-000000001c03");

/// The reserved expense sink category id
pub const EXPENSE_SINK_ID: CategoryId = CategoryId::from_uuid(EXPENSE_SINK_UUID);

/// The reserved income sink category id
pub const INCOME_SINK_ID: CategoryId = CategoryId::from_uuid(INCOME_SINK_UUID);

/// A budget category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Flow direction this category applies to
    pub kind: FlowKind,

    /// Optional parent category; `None` means root
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

impl Category {
    /// Create a new root category
    pub fn new(name: impl Into<String>, kind: FlowKind) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            kind,
            parent_id: None,
        }
    }

    /// Create a new subcategory under the given parent
    pub fn with_parent(name: impl Into<String>, kind: FlowKind, parent_id: CategoryId) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            kind,
            parent_id: Some(parent_id),
        }
    }

    /// Whether this is one of the two reserved sink categories
    pub fn is_sink(&self) -> bool {
        self.id == EXPENSE_SINK_ID || self.id == INCOME_SINK_ID
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Category name cannot be empty".into());
        }
        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The sink category id for a flow kind
pub fn sink_for(kind: FlowKind) -> CategoryId {
    match kind {
        FlowKind::Expense => EXPENSE_SINK_ID,
        FlowKind::Income => INCOME_SINK_ID,
    }
}

/// Build the default category set for a fresh book
///
/// Includes the two reserved sinks plus a starter set of common root
/// categories. Used at first startup and when migrating legacy documents.
pub fn default_categories() -> Vec<Category> {
    let mut categories = vec![
        Category {
            id: EXPENSE_SINK_ID,
            name: "Uncategorized".into(),
            kind: FlowKind::Expense,
            parent_id: None,
        },
        Category {
            id: INCOME_SINK_ID,
            name: "Various Income".into(),
            kind: FlowKind::Income,
            parent_id: None,
        },
    ];

    for name in ["Groceries", "Housing", "Transport", "Subscriptions"] {
        categories.push(Category::new(name, FlowKind::Expense));
    }
    categories.push(Category::new("Salary", FlowKind::Income));

    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_detection() {
        let sink = Category {
            id: EXPENSE_SINK_ID,
            name: "Uncategorized".into(),
            kind: FlowKind::Expense,
            parent_id: None,
        };
        assert!(sink.is_sink());

        let plain = Category::new("Groceries", FlowKind::Expense);
        assert!(!plain.is_sink());
    }

    #[test]
    fn test_sink_for() {
        assert_eq!(sink_for(FlowKind::Expense), EXPENSE_SINK_ID);
        assert_eq!(sink_for(FlowKind::Income), INCOME_SINK_ID);
    }

    #[test]
    fn test_default_categories_contain_both_sinks() {
        let defaults = default_categories();
        assert!(defaults.iter().any(|c| c.id == EXPENSE_SINK_ID));
        assert!(defaults.iter().any(|c| c.id == INCOME_SINK_ID));
        // Sinks are roots
        assert!(defaults
            .iter()
            .filter(|c| c.is_sink())
            .all(|c| c.parent_id.is_none()));
    }

    #[test]
    fn test_validate() {
        let mut cat = Category::new("Groceries", FlowKind::Expense);
        assert!(cat.validate().is_ok());
        cat.name = "  ".into();
        assert!(cat.validate().is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let cat = Category::with_parent("Streaming", FlowKind::Expense, CategoryId::new());
        let json = serde_json::to_string(&cat).unwrap();
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(cat, back);
    }
}
