//! CLI command handlers
//!
//! Bridges clap argument parsing with the budget book.

pub mod account;
pub mod audit;
pub mod backup;
pub mod category;
pub mod goal;
pub mod import;
pub mod rule;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use audit::{handle_audit_command, AuditCommands};
pub use backup::{handle_backup_command, BackupCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use import::{handle_import_command, ImportCommands};
pub use rule::{handle_rule_command, RuleCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
