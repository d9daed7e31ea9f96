//! Account model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;

/// A bank account that owns transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Name of the bank or institution
    pub bank_name: String,

    /// Display name chosen by the user
    pub name: String,

    /// Optional account number (free text, kept as provided)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl Account {
    /// Create a new account
    pub fn new(bank_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: AccountId::new(),
            bank_name: bank_name.into(),
            name: name.into(),
            number: None,
        }
    }

    /// Set the account number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Account name cannot be empty".into());
        }
        if self.bank_name.trim().is_empty() {
            return Err("Bank name cannot be empty".into());
        }
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.bank_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let account = Account::new("Acme Bank", "Checking").with_number("DE00 1234");
        assert_eq!(account.name, "Checking");
        assert_eq!(account.bank_name, "Acme Bank");
        assert_eq!(account.number.as_deref(), Some("DE00 1234"));
        assert!(account.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_names() {
        let account = Account::new("", "Checking");
        assert!(account.validate().is_err());

        let account = Account::new("Acme Bank", " ");
        assert!(account.validate().is_err());
    }

    #[test]
    fn test_display() {
        let account = Account::new("Acme Bank", "Checking");
        assert_eq!(account.to_string(), "Checking (Acme Bank)");
    }
}
