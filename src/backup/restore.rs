//! Export and restore of full book documents
//!
//! A restored document goes through the same migration path as a normal
//! startup load. The live book is only replaced after the whole document
//! parsed successfully; any failure leaves the current state untouched.

use std::path::Path;

use serde_json::Value;

use crate::error::{FinbookError, FinbookResult};
use crate::storage::write_json_atomic;
use crate::store::{migrate, BudgetBook};

/// Write the current book state to a caller-chosen path
pub fn export_book<P: AsRef<Path>>(book: &BudgetBook, path: P) -> FinbookResult<()> {
    write_json_atomic(path, &book.snapshot())
}

/// Replace the book's state with the document at `path`
///
/// The document is validated and migrated in full before anything is
/// committed; a missing transactions or categories collection is a
/// validation error.
pub fn restore_book<P: AsRef<Path>>(book: &mut BudgetBook, path: P) -> FinbookResult<()> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| FinbookError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let raw: Value = serde_json::from_str(&contents)
        .map_err(|e| FinbookError::Parse(format!("Not a valid book document: {}", e)))?;
    let snapshot = migrate::migrate(raw)?;
    book.restore_snapshot(snapshot, &path.display().to_string());
    Ok(())
}
