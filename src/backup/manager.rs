//! Rolling automatic backups with retention pruning
//!
//! Backups are full book snapshots written as dated JSON files into the
//! backup directory. Retention keeps a configurable number of daily
//! backups plus a longer tail of monthly ones (the first backup of a
//! month counts as monthly).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

use crate::config::{BackupRetention, FinbookPaths};
use crate::error::{FinbookError, FinbookResult};
use crate::storage::write_json_atomic;
use crate::store::BookSnapshot;

/// Metadata about one backup file
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// First backup of its month, kept on the longer retention schedule
    pub is_monthly: bool,
}

/// Creates and prunes rolling backups
pub struct BackupManager {
    backup_dir: PathBuf,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: &FinbookPaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            retention,
        }
    }

    /// Write a snapshot as a new dated backup file and return its path
    pub fn create_backup(&self, snapshot: &BookSnapshot) -> FinbookResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| FinbookError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let filename = format!("backup-{}.json", now.format("%Y%m%d-%H%M%S"));
        let backup_path = self.backup_dir.join(&filename);
        write_json_atomic(&backup_path, snapshot)?;
        Ok(backup_path)
    }

    /// All backups in the directory, newest first
    pub fn list_backups(&self) -> FinbookResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| FinbookError::Io(format!("Failed to read backup directory: {}", e)))?;
        for entry in entries {
            let entry = entry
                .map_err(|e| FinbookError::Io(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Most recent backup, if any
    pub fn latest_backup(&self) -> FinbookResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Delete backups beyond the retention counts. Returns the deleted
    /// paths.
    pub fn enforce_retention(&self) -> FinbookResult<Vec<PathBuf>> {
        let backups = self.list_backups()?;
        let mut deleted = Vec::new();

        let (monthly, daily): (Vec<_>, Vec<_>) = backups.into_iter().partition(|b| b.is_monthly);

        for backup in daily.into_iter().skip(self.retention.daily_count as usize) {
            fs::remove_file(&backup.path)
                .map_err(|e| FinbookError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }
        for backup in monthly
            .into_iter()
            .skip(self.retention.monthly_count as usize)
        {
            fs::remove_file(&backup.path).map_err(|e| {
                FinbookError::Io(format!("Failed to delete old monthly backup: {}", e))
            })?;
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Create a backup, then prune
    pub fn create_backup_with_retention(
        &self,
        snapshot: &BookSnapshot,
    ) -> FinbookResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup(snapshot)?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let date_part = filename.strip_prefix("backup-")?.strip_suffix(".json")?;

    let created_at = NaiveDateTime::parse_from_str(date_part, "%Y%m%d-%H%M%S")
        .ok()?
        .and_utc();
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
        is_monthly: created_at.day() == 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager_with_retention(daily: u32, monthly: u32) -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let retention = BackupRetention {
            daily_count: daily,
            monthly_count: monthly,
        };
        (BackupManager::new(&paths, retention), temp_dir)
    }

    fn write_named_backup(manager: &BackupManager, name: &str) {
        fs::create_dir_all(manager.backup_dir()).unwrap();
        let snapshot = BookSnapshot::fresh();
        let json = serde_json::to_string(&snapshot).unwrap();
        fs::write(manager.backup_dir().join(name), json).unwrap();
    }

    #[test]
    fn test_create_and_list() {
        let (manager, _temp) = manager_with_retention(30, 12);
        let snapshot = BookSnapshot::fresh();
        let path = manager.create_backup(&snapshot).unwrap();
        assert!(path.exists());

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert!(backups[0].size_bytes > 0);
    }

    #[test]
    fn test_list_ignores_unrelated_files() {
        let (manager, _temp) = manager_with_retention(30, 12);
        fs::create_dir_all(manager.backup_dir()).unwrap();
        fs::write(manager.backup_dir().join("notes.txt"), "hi").unwrap();
        fs::write(manager.backup_dir().join("other.json"), "{}").unwrap();

        assert!(manager.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_retention_prunes_oldest_daily() {
        let (manager, _temp) = manager_with_retention(2, 12);

        write_named_backup(&manager, "backup-20240302-120000.json");
        write_named_backup(&manager, "backup-20240303-120000.json");
        write_named_backup(&manager, "backup-20240304-120000.json");

        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 1);
        assert!(deleted[0].ends_with("backup-20240302-120000.json"));
        assert_eq!(manager.list_backups().unwrap().len(), 2);
    }

    #[test]
    fn test_monthly_backups_kept_on_longer_schedule() {
        let (manager, _temp) = manager_with_retention(1, 12);

        // First-of-month backups are monthly and survive the daily cut
        write_named_backup(&manager, "backup-20240101-120000.json");
        write_named_backup(&manager, "backup-20240201-120000.json");
        write_named_backup(&manager, "backup-20240302-120000.json");
        write_named_backup(&manager, "backup-20240303-120000.json");

        manager.enforce_retention().unwrap();

        let remaining = manager.list_backups().unwrap();
        let names: Vec<_> = remaining.iter().map(|b| b.filename.as_str()).collect();
        assert!(names.contains(&"backup-20240101-120000.json"));
        assert!(names.contains(&"backup-20240201-120000.json"));
        assert!(names.contains(&"backup-20240303-120000.json"));
        assert!(!names.contains(&"backup-20240302-120000.json"));
    }
}
