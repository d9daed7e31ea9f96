//! Transaction CLI commands

use chrono::Utc;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::transaction::format_transaction_register;
use crate::error::{FinbookError, FinbookResult};
use crate::import::parse::{parse_amount, parse_date};
use crate::models::{sink_for, FlowKind, Transaction};
use crate::store::BudgetBook;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a transaction (negative amount for an expense)
    Add {
        /// Account name or ID
        account: String,
        /// Signed amount, e.g. "-45.30" or "2500"
        amount: String,
        /// Description
        description: String,
        /// Category name or ID (defaults to the reserved fallback)
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD or DD/MM/YYYY, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text note
        #[arg(long)]
        notes: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Filter by account name or ID
        #[arg(short, long)]
        account: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete a transaction by ID
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Re-run automation rules over all transactions
    Reapply,
}

/// Handle a transaction command
pub fn handle_transaction_command(
    book: &mut BudgetBook,
    settings: &Settings,
    cmd: TransactionCommands,
) -> FinbookResult<()> {
    match cmd {
        TransactionCommands::Add {
            account,
            amount,
            description,
            category,
            date,
            notes,
        } => {
            let account_id = book
                .find_account(&account)
                .map(|a| a.id)
                .ok_or_else(|| FinbookError::account_not_found(&account))?;

            let signed = parse_amount(&amount)?;
            let kind = FlowKind::from_signed(signed);
            let date = match date {
                Some(raw) => parse_date(&raw)?,
                None => Utc::now().date_naive(),
            };
            let category_id = match category {
                Some(identifier) => book
                    .find_category(&identifier)
                    .map(|c| c.id)
                    .ok_or_else(|| FinbookError::category_not_found(&identifier))?,
                None => sink_for(kind),
            };

            let mut txn = Transaction::new(
                date,
                description,
                signed.abs(),
                kind,
                category_id,
                account_id,
            );
            txn.notes = notes;
            let id = txn.id;
            book.add_transaction(txn)?;
            println!("Added transaction [{}]", id);
        }

        TransactionCommands::List { account, limit } => {
            let account_id = match account {
                Some(identifier) => Some(
                    book.find_account(&identifier)
                        .map(|a| a.id)
                        .ok_or_else(|| FinbookError::account_not_found(&identifier))?,
                ),
                None => None,
            };

            let transactions: Vec<_> = book
                .transactions()
                .iter()
                .filter(|t| account_id.map_or(true, |id| t.account_id == id))
                .take(limit)
                .cloned()
                .collect();

            print!(
                "{}",
                format_transaction_register(
                    &transactions,
                    |id| {
                        book.get_category(id)
                            .map(|c| c.name.clone())
                            .unwrap_or_else(|| "?".to_string())
                    },
                    &settings.currency_symbol,
                )
            );
        }

        TransactionCommands::Delete { id } => {
            let found = book
                .find_transaction(&id)
                .map(|t| t.id)
                .ok_or_else(|| FinbookError::transaction_not_found(&id))?;
            book.delete_transaction(found)?;
            println!("Deleted transaction [{}]", found);
        }

        TransactionCommands::Reapply => {
            let ids: Vec<_> = book.transactions().iter().map(|t| t.id).collect();
            let changed = book.reapply_rules(&ids)?;
            println!("Recategorized {} transaction(s)", changed);
        }
    }

    Ok(())
}
