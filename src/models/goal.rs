//! Savings goal model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, GoalId};
use super::money::Money;

/// A savings goal linked to a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier
    pub id: GoalId,

    /// Goal name
    pub name: String,

    /// Target amount; must be strictly positive
    pub target: Money,

    /// Category whose activity counts toward the goal
    pub category_id: CategoryId,
}

impl Goal {
    /// Create a new goal
    pub fn new(name: impl Into<String>, target: Money, category_id: CategoryId) -> Self {
        Self {
            id: GoalId::new(),
            name: name.into(),
            target,
            category_id,
        }
    }

    /// Validate the goal
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Goal name cannot be empty".into());
        }
        if !self.target.is_positive() {
            return Err("Goal target must be greater than zero".into());
        }
        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.target)
    }
}
