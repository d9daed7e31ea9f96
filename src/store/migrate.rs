//! On-load migration of persisted book documents
//!
//! Documents at the current structure version decode directly. Anything
//! else is assumed to be the legacy pre-subcategory shape, where categories
//! were flat name lists and transactions, goals, and rules referenced them
//! by name string. Migration rewrites every name reference to an id,
//! falling back to the kind-appropriate sink when a name has no mapping.
//! The rewrite is one-way and best-effort; colliding names normalize
//! irrecoverably.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FinbookError, FinbookResult};
use crate::models::{
    sink_for, Account, AccountId, AutomationRule, Category, CategoryId, FlowKind, Goal, GoalId,
    Money, RuleId, Transaction, TransactionId,
};

use super::snapshot::{BookSnapshot, DATA_STRUCTURE_VERSION};

/// Turn a raw persisted document into a current-version snapshot
///
/// A document missing the transaction or category collections is rejected
/// with a validation error before any decoding is attempted, so a caller
/// restoring from a backup can keep its live state on failure.
pub fn migrate(value: Value) -> FinbookResult<BookSnapshot> {
    if value.get("allTransactions").is_none() {
        return Err(FinbookError::Validation(
            "Document is missing the allTransactions collection".to_string(),
        ));
    }
    if value.get("categories").is_none() {
        return Err(FinbookError::Validation(
            "Document is missing the categories collection".to_string(),
        ));
    }

    // Version check short-circuits: current documents pass through as-is.
    let version = value
        .get("dataStructureVersion")
        .and_then(Value::as_u64)
        .unwrap_or(1);

    if version == DATA_STRUCTURE_VERSION as u64 {
        return serde_json::from_value(value)
            .map_err(|e| FinbookError::Parse(format!("Failed to decode book document: {}", e)));
    }

    migrate_legacy(value)
}

/// Legacy (version 1) document shape: flat category name lists, name-string
/// category references, amounts as floating-point currency values.
#[derive(Debug, Deserialize)]
struct LegacyDocument {
    #[serde(rename = "allTransactions")]
    transactions: Vec<LegacyTransaction>,
    /// Expense category names
    #[serde(default)]
    categories: Vec<String>,
    /// Income category names
    #[serde(rename = "incomeCategories", default)]
    income_categories: Vec<String>,
    #[serde(default)]
    goals: Vec<LegacyGoal>,
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(rename = "automationRules", default)]
    rules: Vec<LegacyRule>,
}

#[derive(Debug, Deserialize)]
struct LegacyTransaction {
    #[serde(default)]
    id: Option<TransactionId>,
    date: String,
    description: String,
    amount: f64,
    #[serde(alias = "type", default)]
    kind: Option<FlowKind>,
    #[serde(default)]
    category: Option<String>,
    #[serde(rename = "accountId", default)]
    account_id: Option<AccountId>,
    #[serde(rename = "createdAt", default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct LegacyGoal {
    #[serde(default)]
    id: Option<GoalId>,
    name: String,
    #[serde(alias = "targetAmount")]
    target: f64,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyRule {
    #[serde(default)]
    id: Option<RuleId>,
    keyword: String,
    #[serde(alias = "type")]
    kind: FlowKind,
    #[serde(default)]
    category: Option<String>,
}

fn migrate_legacy(value: Value) -> FinbookResult<BookSnapshot> {
    let legacy: LegacyDocument = serde_json::from_value(value)
        .map_err(|e| FinbookError::Parse(format!("Failed to decode legacy document: {}", e)))?;

    // Start from the default set so the sinks always exist, then add an
    // entity for every legacy name not already covered.
    let mut categories = crate::models::default_categories();
    let mut name_map: HashMap<String, CategoryId> = categories
        .iter()
        .map(|c| (c.name.to_lowercase(), c.id))
        .collect();

    let legacy_names = legacy
        .categories
        .iter()
        .map(|n| (n, FlowKind::Expense))
        .chain(legacy.income_categories.iter().map(|n| (n, FlowKind::Income)));

    for (name, kind) in legacy_names {
        let key = name.trim().to_lowercase();
        if key.is_empty() || name_map.contains_key(&key) {
            continue;
        }
        let category = Category::new(name.trim(), kind);
        name_map.insert(key, category.id);
        categories.push(category);
    }

    let resolve = |name: &Option<String>, kind: FlowKind| -> CategoryId {
        name.as_deref()
            .and_then(|n| name_map.get(&n.trim().to_lowercase()).copied())
            .unwrap_or_else(|| sink_for(kind))
    };

    // Legacy documents may predate accounts entirely; transactions without
    // an account reference all land on one synthesized account.
    let mut accounts = legacy.accounts;
    let mut fallback_account: Option<AccountId> = None;
    let mut fallback_for = |accounts: &mut Vec<Account>| -> AccountId {
        if let Some(id) = fallback_account {
            return id;
        }
        let account = Account::new("Unknown", "Migrated");
        let id = account.id;
        accounts.push(account);
        fallback_account = Some(id);
        id
    };

    let mut transactions = Vec::with_capacity(legacy.transactions.len());
    for legacy_txn in legacy.transactions {
        let date = parse_legacy_date(&legacy_txn.date)?;
        let amount = money_from_float(legacy_txn.amount);
        let kind = legacy_txn
            .kind
            .unwrap_or_else(|| FlowKind::from_signed(Money::from_cents(float_cents(legacy_txn.amount))));
        let account_id = match legacy_txn.account_id {
            Some(id) => id,
            None => fallback_for(&mut accounts),
        };

        transactions.push(Transaction {
            id: legacy_txn.id.unwrap_or_else(TransactionId::new),
            date,
            description: legacy_txn.description,
            amount,
            kind,
            category_id: resolve(&legacy_txn.category, kind),
            account_id,
            notes: None,
            created_at: legacy_txn.created_at.unwrap_or_else(Utc::now),
        });
    }

    let goals = legacy
        .goals
        .into_iter()
        .map(|g| Goal {
            id: g.id.unwrap_or_else(GoalId::new),
            name: g.name,
            target: money_from_float(g.target),
            category_id: resolve(&g.category, FlowKind::Expense),
        })
        .collect();

    let rules = legacy
        .rules
        .into_iter()
        .map(|r| AutomationRule {
            id: r.id.unwrap_or_else(RuleId::new),
            kind: r.kind,
            category_id: resolve(&r.category, r.kind),
            keyword: r.keyword,
        })
        .collect();

    Ok(BookSnapshot {
        transactions,
        categories,
        goals,
        accounts,
        rules,
        version: DATA_STRUCTURE_VERSION,
    })
}

fn float_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn money_from_float(amount: f64) -> Money {
    Money::from_cents(float_cents(amount)).abs()
}

fn parse_legacy_date(raw: &str) -> FinbookResult<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|_| FinbookError::Parse(format!("Unparseable transaction date '{}'", raw)))
}
