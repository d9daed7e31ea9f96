//! Transaction display formatting

use crate::import::RejectedRow;
use crate::models::{CategoryId, FlowKind, Transaction};
use crate::store::ImportOutcome;

/// Format a single transaction as a register row
pub fn format_transaction_row<F>(txn: &Transaction, category_name: F, symbol: &str) -> String
where
    F: Fn(CategoryId) -> String,
{
    let sign = match txn.kind {
        FlowKind::Expense => "-",
        FlowKind::Income => "+",
    };

    format!(
        "{} {:10} {:30} {:>12} {:20} [{}]",
        txn.date.format("%Y-%m-%d"),
        sign,
        truncate(&txn.description, 30),
        txn.amount.format_with_symbol(symbol),
        truncate(&category_name(txn.category_id), 20),
        txn.id
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register<F>(
    transactions: &[Transaction],
    category_name: F,
    symbol: &str,
) -> String
where
    F: Fn(CategoryId) -> String,
{
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:10} {:10} {:30} {:>12} {:20}\n",
        "Date", "Direction", "Description", "Amount", "Category"
    ));
    output.push_str(&"-".repeat(88));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, &category_name, symbol));
        output.push('\n');
    }

    output
}

/// Summarize an import outcome
pub fn format_import_outcome(outcome: &ImportOutcome) -> String {
    format!(
        "Imported {} of {} records ({} duplicates skipped)",
        outcome.imported, outcome.received, outcome.duplicates_skipped
    )
}

/// List the rows an import rejected, with reasons
pub fn format_rejected_rows(rejected: &[RejectedRow]) -> String {
    if rejected.is_empty() {
        return String::new();
    }

    let mut output = format!("{} row(s) could not be imported:\n", rejected.len());
    for row in rejected {
        output.push_str(&format!(
            "  row {}: {} ({})\n",
            row.row_number,
            row.raw.join(" | "),
            row.reason
        ));
    }
    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
