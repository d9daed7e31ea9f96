//! Audit log CLI commands

use clap::Subcommand;

use crate::error::FinbookResult;
use crate::store::BudgetBook;

/// Audit subcommands
#[derive(Subcommand)]
pub enum AuditCommands {
    /// Show recent audit entries
    Recent {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show the audit log file location
    Path,
}

/// Handle an audit command
pub fn handle_audit_command(book: &BudgetBook, cmd: AuditCommands) -> FinbookResult<()> {
    match cmd {
        AuditCommands::Recent { limit } => {
            let entries = book.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("Audit log is empty.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }

        AuditCommands::Path => {
            println!("{}", book.audit().path().display());
        }
    }

    Ok(())
}
