//! Backup and restore
//!
//! Manual export/restore of the full book document, plus rolling automatic
//! backups with retention pruning.

pub mod manager;
pub mod restore;

pub use manager::{BackupInfo, BackupManager};
pub use restore::{export_book, restore_book};
