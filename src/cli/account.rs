//! Account CLI commands

use clap::Subcommand;

use crate::display::account::format_account_list;
use crate::error::{FinbookError, FinbookResult};
use crate::models::Account;
use crate::store::BudgetBook;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Add a new account
    Add {
        /// Bank or institution name
        bank: String,
        /// Display name for the account
        name: String,
        /// Account number (free text)
        #[arg(short = 'n', long)]
        number: Option<String>,
    },

    /// List all accounts
    List,

    /// Edit an account
    Edit {
        /// Account name or ID
        account: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New bank name
        #[arg(long)]
        bank: Option<String>,
        /// New account number
        #[arg(long)]
        number: Option<String>,
    },

    /// Delete an account (blocked while transactions reference it)
    Delete {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(book: &mut BudgetBook, cmd: AccountCommands) -> FinbookResult<()> {
    match cmd {
        AccountCommands::Add { bank, name, number } => {
            let mut account = Account::new(bank, name);
            if let Some(number) = number {
                account = account.with_number(number);
            }
            let display = account.to_string();
            book.add_account(account)?;
            println!("Added account {}", display);
        }

        AccountCommands::List => {
            print!("{}", format_account_list(book.accounts()));
        }

        AccountCommands::Edit {
            account,
            name,
            bank,
            number,
        } => {
            let mut found = book
                .find_account(&account)
                .cloned()
                .ok_or_else(|| FinbookError::account_not_found(&account))?;
            if let Some(name) = name {
                found.name = name;
            }
            if let Some(bank) = bank {
                found.bank_name = bank;
            }
            if let Some(number) = number {
                found.number = Some(number);
            }
            let display = found.to_string();
            book.update_account(found)?;
            println!("Updated account {}", display);
        }

        AccountCommands::Delete { account } => {
            let found = book
                .find_account(&account)
                .cloned()
                .ok_or_else(|| FinbookError::account_not_found(&account))?;
            book.delete_account(found.id)?;
            println!("Deleted account {}", found);
        }
    }

    Ok(())
}
