//! Goal CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::category::format_goal_list;
use crate::error::{FinbookError, FinbookResult};
use crate::import::parse::parse_amount;
use crate::models::Goal;
use crate::store::BudgetBook;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Add a savings goal
    Add {
        /// Goal name
        name: String,
        /// Target amount, e.g. "500" or "500.00"
        target: String,
        /// Category whose activity counts toward the goal
        category: String,
    },

    /// List all goals
    List,

    /// Delete a goal
    Delete {
        /// Goal name or ID
        goal: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    book: &mut BudgetBook,
    settings: &Settings,
    cmd: GoalCommands,
) -> FinbookResult<()> {
    match cmd {
        GoalCommands::Add {
            name,
            target,
            category,
        } => {
            let category_id = book
                .find_category(&category)
                .map(|c| c.id)
                .ok_or_else(|| FinbookError::category_not_found(&category))?;
            let target = parse_amount(&target)?.abs();

            let goal = Goal::new(name, target, category_id);
            let display = goal.name.clone();
            book.add_goal(goal)?;
            println!("Added goal '{}'", display);
        }

        GoalCommands::List => {
            print!(
                "{}",
                format_goal_list(
                    book.goals(),
                    |id| {
                        book.get_category(id)
                            .map(|c| c.name.clone())
                            .unwrap_or_else(|| "?".to_string())
                    },
                    &settings.currency_symbol,
                )
            );
        }

        GoalCommands::Delete { goal } => {
            let found = book
                .find_goal(&goal)
                .cloned()
                .ok_or_else(|| FinbookError::goal_not_found(&goal))?;
            book.delete_goal(found.id)?;
            println!("Deleted goal '{}'", found.name);
        }
    }

    Ok(())
}
