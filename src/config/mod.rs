//! Configuration and path management

pub mod paths;
pub mod settings;

pub use paths::FinbookPaths;
pub use settings::{BackupRetention, Settings};
