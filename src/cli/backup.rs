//! Backup CLI commands

use clap::Subcommand;

use crate::backup::{export_book, restore_book, BackupManager};
use crate::config::Settings;
use crate::display::backup::format_backup_list;
use crate::error::FinbookResult;
use crate::store::BudgetBook;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a rolling backup and prune old ones
    Create,

    /// List existing backups
    List,

    /// Export the book to a chosen file
    Export {
        /// Destination path
        path: String,
    },

    /// Restore the book from a backup or exported file
    Restore {
        /// Source path
        path: String,
    },

    /// Delete backups beyond the retention policy
    Prune,
}

/// Handle a backup command
pub fn handle_backup_command(
    book: &mut BudgetBook,
    settings: &Settings,
    cmd: BackupCommands,
) -> FinbookResult<()> {
    let manager = BackupManager::new(book.paths(), settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => {
            let (path, deleted) = manager.create_backup_with_retention(&book.snapshot())?;
            println!("Created backup {}", path.display());
            if !deleted.is_empty() {
                println!("Pruned {} old backup(s)", deleted.len());
            }
        }

        BackupCommands::List => {
            print!("{}", format_backup_list(&manager.list_backups()?));
        }

        BackupCommands::Export { path } => {
            export_book(book, &path)?;
            println!("Exported book to {}", path);
        }

        BackupCommands::Restore { path } => {
            restore_book(book, &path)?;
            println!(
                "Restored book from {} ({} transactions, {} categories)",
                path,
                book.transactions().len(),
                book.categories().len()
            );
        }

        BackupCommands::Prune => {
            let deleted = manager.enforce_retention()?;
            println!("Pruned {} backup(s)", deleted.len());
        }
    }

    Ok(())
}
