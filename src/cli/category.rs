//! Category CLI commands

use clap::Subcommand;

use crate::display::category::format_category_tree;
use crate::error::{FinbookError, FinbookResult};
use crate::models::FlowKind;
use crate::store::BudgetBook;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Show the category tree
    List,

    /// Add a new category
    Add {
        /// Category name
        name: String,
        /// Parent category name or ID (same kind required)
        #[arg(short, long)]
        parent: Option<String>,
        /// Create an income category instead of an expense one
        #[arg(long)]
        income: bool,
    },

    /// Rename a category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },

    /// Delete a category; its transactions, rules, and goals move to the
    /// reserved fallback category
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(book: &mut BudgetBook, cmd: CategoryCommands) -> FinbookResult<()> {
    match cmd {
        CategoryCommands::List => {
            print!("{}", format_category_tree(book.categories()));
        }

        CategoryCommands::Add {
            name,
            parent,
            income,
        } => {
            let kind = if income {
                FlowKind::Income
            } else {
                FlowKind::Expense
            };
            let parent_id = match parent {
                Some(identifier) => Some(
                    book.find_category(&identifier)
                        .map(|c| c.id)
                        .ok_or_else(|| FinbookError::category_not_found(&identifier))?,
                ),
                None => None,
            };
            let category = book.add_category(&name, kind, parent_id)?;
            println!("Added {} category '{}'", category.kind, category.name);
        }

        CategoryCommands::Rename { category, name } => {
            let found = book
                .find_category(&category)
                .cloned()
                .ok_or_else(|| FinbookError::category_not_found(&category))?;
            book.update_category(found.id, &name)?;
            println!("Renamed '{}' to '{}'", found.name, name.trim());
        }

        CategoryCommands::Delete { category } => {
            let found = book
                .find_category(&category)
                .cloned()
                .ok_or_else(|| FinbookError::category_not_found(&category))?;
            book.delete_category(found.id)?;
            println!("Deleted category '{}'", found.name);
        }
    }

    Ok(())
}
