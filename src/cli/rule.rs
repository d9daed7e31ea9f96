//! Automation rule CLI commands

use clap::Subcommand;

use crate::display::category::format_rule_list;
use crate::error::{FinbookError, FinbookResult};
use crate::models::{AutomationRule, FlowKind};
use crate::store::BudgetBook;

/// Rule subcommands
#[derive(Subcommand)]
pub enum RuleCommands {
    /// Add a keyword rule
    Add {
        /// Keyword matched against transaction descriptions
        keyword: String,
        /// Target category name or ID
        category: String,
        /// Match income transactions instead of expenses
        #[arg(long)]
        income: bool,
    },

    /// List all rules
    List,

    /// Change a rule's keyword or target category
    Edit {
        /// Rule keyword or ID
        rule: String,
        /// New keyword
        #[arg(short, long)]
        keyword: Option<String>,
        /// New target category name or ID
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete a rule
    Delete {
        /// Rule keyword or ID
        rule: String,
    },
}

/// Handle a rule command
pub fn handle_rule_command(book: &mut BudgetBook, cmd: RuleCommands) -> FinbookResult<()> {
    match cmd {
        RuleCommands::Add {
            keyword,
            category,
            income,
        } => {
            let kind = if income {
                FlowKind::Income
            } else {
                FlowKind::Expense
            };
            let category_id = book
                .find_category(&category)
                .map(|c| c.id)
                .ok_or_else(|| FinbookError::category_not_found(&category))?;

            let rule = AutomationRule::new(keyword.trim(), kind, category_id);
            let display = rule.keyword.clone();
            book.add_rule(rule)?;
            println!("Added rule \"{}\"", display);
        }

        RuleCommands::List => {
            print!(
                "{}",
                format_rule_list(book.rules(), |id| {
                    book.get_category(id)
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| "?".to_string())
                })
            );
        }

        RuleCommands::Edit {
            rule,
            keyword,
            category,
        } => {
            let mut found = book
                .find_rule(&rule)
                .cloned()
                .ok_or_else(|| FinbookError::rule_not_found(&rule))?;
            if let Some(keyword) = keyword {
                found.keyword = keyword.trim().to_string();
            }
            if let Some(category) = category {
                found.category_id = book
                    .find_category(&category)
                    .map(|c| c.id)
                    .ok_or_else(|| FinbookError::category_not_found(&category))?;
            }
            let display = found.keyword.clone();
            book.update_rule(found)?;
            println!("Updated rule \"{}\"", display);
        }

        RuleCommands::Delete { rule } => {
            let found = book
                .find_rule(&rule)
                .cloned()
                .ok_or_else(|| FinbookError::rule_not_found(&rule))?;
            book.delete_rule(found.id)?;
            println!("Deleted rule \"{}\"", found.keyword);
        }
    }

    Ok(())
}
