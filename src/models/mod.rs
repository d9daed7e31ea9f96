//! Core data models for FinBook
//!
//! This module contains all the data structures that represent the budgeting
//! domain: accounts, transactions, categories, automation rules, and goals.

pub mod account;
pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod rule;
pub mod transaction;

pub use account::Account;
pub use category::{default_categories, sink_for, Category, EXPENSE_SINK_ID, INCOME_SINK_ID};
pub use goal::Goal;
pub use ids::{AccountId, CategoryId, GoalId, RuleId, TransactionId};
pub use money::Money;
pub use rule::AutomationRule;
pub use transaction::{FlowKind, Transaction};
