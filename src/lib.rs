//! FinBook - personal finance bookkeeping from the command line
//!
//! FinBook keeps a single budget book: accounts, transactions, a category
//! tree, keyword-based automation rules, and savings goals, persisted as
//! one JSON document. Bank statements are imported through a staging
//! session with column mapping and duplicate detection.
//!
//! # Architecture
//!
//! - `config`: paths and settings
//! - `error`: custom error types
//! - `models`: core data models
//! - `storage`: atomic JSON file I/O
//! - `store`: the budget book (entity collections, persistence, migration)
//! - `rules`: keyword-based category matcher
//! - `import`: statement import staging pipeline
//! - `extract`: external text-extraction/categorization boundary
//! - `backup`: export, restore, and rolling backups
//! - `audit`: append-only audit logging
//! - `display`: terminal output formatting
//! - `cli`: command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use finbook::config::FinbookPaths;
//! use finbook::store::BudgetBook;
//!
//! let paths = FinbookPaths::new()?;
//! let mut book = BudgetBook::open(paths)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod extract;
pub mod import;
pub mod models;
pub mod rules;
pub mod storage;
pub mod store;
