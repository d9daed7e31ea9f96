//! Append-only audit log
//!
//! Every store mutation is recorded as a JSON line in `audit.log`. The log
//! also records swallowed persistence failures, which is the only trace a
//! failed save leaves behind.

pub mod entry;
pub mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
