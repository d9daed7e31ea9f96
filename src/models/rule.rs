//! Automation rule model
//!
//! An automation rule maps a keyword found in a transaction description to
//! a target category. Rules are scoped by flow kind and matched
//! case-insensitively.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, RuleId};
use super::transaction::FlowKind;

/// A keyword-to-category automation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    /// Unique identifier
    pub id: RuleId,

    /// Keyword looked up as a case-insensitive substring of descriptions
    pub keyword: String,

    /// Flow kind this rule applies to
    pub kind: FlowKind,

    /// Category assigned when the rule matches
    pub category_id: CategoryId,
}

impl AutomationRule {
    /// Create a new rule
    pub fn new(keyword: impl Into<String>, kind: FlowKind, category_id: CategoryId) -> Self {
        Self {
            id: RuleId::new(),
            keyword: keyword.into(),
            kind,
            category_id,
        }
    }

    /// Validate the rule
    pub fn validate(&self) -> Result<(), String> {
        if self.keyword.trim().is_empty() {
            return Err("Rule keyword cannot be empty".into());
        }
        Ok(())
    }
}

impl fmt::Display for AutomationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.keyword, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rule() {
        let category = CategoryId::new();
        let rule = AutomationRule::new("netflix", FlowKind::Expense, category);
        assert_eq!(rule.keyword, "netflix");
        assert_eq!(rule.category_id, category);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_keyword() {
        let rule = AutomationRule::new("  ", FlowKind::Expense, CategoryId::new());
        assert!(rule.validate().is_err());
    }
}
