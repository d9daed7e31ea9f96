//! Import CLI commands

use clap::Subcommand;

use crate::display::transaction::{format_import_outcome, format_rejected_rows};
use crate::error::{FinbookError, FinbookResult};
use crate::import::{read_csv_rows, ColumnMapping, ImportSession};
use crate::store::BudgetBook;

/// Import subcommands
#[derive(Subcommand)]
pub enum ImportCommands {
    /// Import transactions from a CSV file
    Csv {
        /// Path to the CSV file
        file: String,
        /// Target account name or ID
        #[arg(short, long)]
        account: String,
        /// Override the detected date column (0-based)
        #[arg(long)]
        date_col: Option<usize>,
        /// Override the detected description column (0-based)
        #[arg(long)]
        description_col: Option<usize>,
        /// Override the detected amount column (0-based)
        #[arg(long)]
        amount_col: Option<usize>,
        /// Stage and report only; do not write anything
        #[arg(long)]
        dry_run: bool,
    },
}

/// Handle an import command
pub fn handle_import_command(book: &mut BudgetBook, cmd: ImportCommands) -> FinbookResult<()> {
    match cmd {
        ImportCommands::Csv {
            file,
            account,
            date_col,
            description_col,
            amount_col,
            dry_run,
        } => {
            let account_id = book
                .find_account(&account)
                .map(|a| a.id)
                .ok_or_else(|| FinbookError::account_not_found(&account))?;

            let (headers, rows) = read_csv_rows(&file)?;
            let mut session = ImportSession::begin(account_id);
            session.load_rows(headers, rows)?;

            let mut mapping = session.mapping().clone();
            if let Some(col) = date_col {
                mapping.date = Some(col);
            }
            if let Some(col) = description_col {
                mapping.description = Some(col);
            }
            if let Some(col) = amount_col {
                mapping.amount = Some(col);
            }
            if &mapping != session.mapping() {
                session.set_mapping(mapping)?;
            }

            let rules = book.rules().to_vec();
            session.stage(&rules)?;

            if dry_run {
                println!(
                    "Would import {} record(s) from {}",
                    session.staged().len(),
                    file
                );
                print!("{}", format_rejected_rows(session.rejected()));
                session.cancel();
                return Ok(());
            }

            let (outcome, rejected) = session.confirm(book)?;
            println!("{}", format_import_outcome(&outcome));
            print!("{}", format_rejected_rows(&rejected));
        }
    }

    Ok(())
}
