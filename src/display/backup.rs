//! Backup display formatting

use crate::backup::BackupInfo;

/// Format a list of backups, newest first
pub fn format_backup_list(backups: &[BackupInfo]) -> String {
    if backups.is_empty() {
        return "No backups found.\n".to_string();
    }

    let mut output = String::new();
    for backup in backups {
        let kind = if backup.is_monthly { "monthly" } else { "daily" };
        output.push_str(&format!(
            "{} {:>8} {:>10} {}\n",
            backup.created_at.format("%Y-%m-%d %H:%M:%S"),
            kind,
            format_size(backup.size_bytes),
            backup.filename
        ));
    }
    output
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_empty_backup_list() {
        assert!(format_backup_list(&[]).contains("No backups"));
    }
}
