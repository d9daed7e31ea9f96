//! Terminal output formatting
//!
//! Plain `format!`-based helpers turning entities into printable text.
//! No table or color crates; output is meant to stay grep-friendly.

pub mod account;
pub mod backup;
pub mod category;
pub mod transaction;
