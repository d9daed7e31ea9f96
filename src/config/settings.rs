//! User settings for FinBook
//!
//! Manages user preferences including display formats and backup retention.

use serde::{Deserialize, Serialize};

use super::paths::FinbookPaths;
use crate::error::FinbookError;
use crate::storage::file_io::{read_json, write_json_atomic};

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of daily backups to keep
    pub daily_count: u32,
    /// Number of monthly backups to keep
    pub monthly_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            daily_count: 30,
            monthly_count: 12,
        }
    }
}

/// User settings for FinBook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Whether initial setup has been completed
    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup_retention: BackupRetention::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, creating defaults if no file exists
    pub fn load_or_create(paths: &FinbookPaths) -> Result<Self, FinbookError> {
        let path = paths.settings_file();
        if path.exists() {
            read_json(&path)
        } else {
            let settings = Self::default();
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinbookPaths) -> Result<(), FinbookError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.backup_retention.daily_count, 30);
        assert!(!settings.setup_completed);
    }

    #[test]
    fn test_load_or_create_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        // First call creates the file with defaults
        let settings = Settings::load_or_create(&paths).unwrap();
        assert!(paths.settings_file().exists());

        // Second call loads the same values back
        let reloaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.currency_symbol, reloaded.currency_symbol);
        assert_eq!(settings.date_format, reloaded.date_format);
    }

    #[test]
    fn test_missing_fields_default() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        std::fs::write(paths.settings_file(), r#"{"currency_symbol": "€"}"#).unwrap();

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.date_format, "%Y-%m-%d");
    }
}
