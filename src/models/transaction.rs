//! Transaction model
//!
//! A transaction is a dated amount of money flowing into or out of an
//! account. The amount is always a non-negative magnitude; direction is
//! carried by [`FlowKind`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, TransactionId};
use super::money::Money;

/// Direction of a money flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlowKind {
    Income,
    Expense,
}

impl FlowKind {
    /// Derive the kind from a signed amount: negative means expense
    pub fn from_signed(amount: Money) -> Self {
        if amount.is_negative() {
            Self::Expense
        } else {
            Self::Income
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A single booked transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Transaction date
    pub date: NaiveDate,

    /// Description as it appeared on the statement (or as entered)
    pub description: String,

    /// Magnitude of the flow; never negative
    pub amount: Money,

    /// Flow direction
    pub kind: FlowKind,

    /// Assigned category
    pub category_id: CategoryId,

    /// Owning account
    pub account_id: AccountId,

    /// Optional free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the record was created (sort tiebreaker for same-date entries)
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction with a fresh identifier
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        kind: FlowKind,
        category_id: CategoryId,
        account_id: AccountId,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            date,
            description: description.into(),
            amount: amount.abs(),
            kind,
            category_id,
            account_id,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Composite key used for duplicate detection on import:
    /// (date, normalized description, amount, account)
    pub fn dedup_key(&self) -> (NaiveDate, String, i64, AccountId) {
        (
            self.date,
            self.description.trim().to_lowercase(),
            self.amount.cents(),
            self.account_id,
        )
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Transaction description cannot be empty".into());
        }
        if self.amount.is_negative() {
            return Err("Transaction amount cannot be negative".into());
        }
        Ok(())
    }
}
