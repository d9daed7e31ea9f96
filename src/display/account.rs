//! Account display formatting

use crate::models::Account;

/// Format a list of accounts
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let mut output = String::new();
    for account in accounts {
        let number = account
            .number
            .as_deref()
            .map(|n| format!(" · {}", n))
            .unwrap_or_default();
        output.push_str(&format!("{}{} [{}]\n", account, number, account.id));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_shows_bank_and_number() {
        let account = Account::new("Sparkasse", "Checking").with_number("DE12 3456");
        let output = format_account_list(&[account]);
        assert!(output.contains("Checking (Sparkasse)"));
        assert!(output.contains("DE12 3456"));
    }

    #[test]
    fn test_empty_list() {
        assert!(format_account_list(&[]).contains("No accounts"));
    }
}
