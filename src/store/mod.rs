//! Budget book: the owning context for all entity collections
//!
//! `BudgetBook` is constructed explicitly and passed to whoever needs it.
//! Lifecycle is load → mutate → persist: every successful mutation writes
//! the full snapshot back to disk and appends an audit entry. A failed
//! persistence write is recorded in the audit log and otherwise swallowed;
//! the in-memory state stays authoritative for the session.

pub mod migrate;
pub mod snapshot;

pub use snapshot::{BookSnapshot, DATA_STRUCTURE_VERSION};

use serde_json::Value;

use crate::audit::{AuditEntry, AuditLogger, EntityType, Operation};
use crate::config::FinbookPaths;
use crate::error::{FinbookError, FinbookResult};
use crate::models::{
    sink_for, Account, AccountId, AutomationRule, Category, CategoryId, FlowKind, Goal, GoalId,
    RuleId, Transaction, TransactionId, EXPENSE_SINK_ID, INCOME_SINK_ID,
};
use crate::rules::match_category;
use crate::storage::{read_json_required, write_json_atomic};

/// Result of an import batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Number of records handed to the store
    pub received: usize,
    /// Number of records actually added after deduplication
    pub imported: usize,
    /// Number of records dropped as duplicates
    pub duplicates_skipped: usize,
}

/// The complete budget book with all entity collections
pub struct BudgetBook {
    paths: FinbookPaths,
    audit: AuditLogger,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    accounts: Vec<Account>,
    rules: Vec<AutomationRule>,
    goals: Vec<Goal>,
}

impl BudgetBook {
    /// Open the book at the given paths, loading and migrating the persisted
    /// document. A missing data file yields a fresh book with the default
    /// category set.
    pub fn open(paths: FinbookPaths) -> FinbookResult<Self> {
        paths.ensure_directories()?;

        let book_file = paths.book_file();
        let is_new = !book_file.exists();
        let snapshot = if is_new {
            BookSnapshot::fresh()
        } else {
            let raw: Value = read_json_required(&book_file)?;
            migrate::migrate(raw)?
        };

        let audit = AuditLogger::new(paths.audit_log());
        let mut book = Self {
            paths,
            audit,
            transactions: snapshot.transactions,
            categories: snapshot.categories,
            accounts: snapshot.accounts,
            rules: snapshot.rules,
            goals: snapshot.goals,
        };
        book.ensure_sinks();
        book.sort_transactions();
        if is_new {
            book.persist();
        }
        Ok(book)
    }

    /// The two reserved sink categories must exist in every book, whatever
    /// the loaded document contained.
    fn ensure_sinks(&mut self) {
        if !self.categories.iter().any(|c| c.id == EXPENSE_SINK_ID) {
            self.categories.push(Category {
                id: EXPENSE_SINK_ID,
                name: "Uncategorized".into(),
                kind: FlowKind::Expense,
                parent_id: None,
            });
        }
        if !self.categories.iter().any(|c| c.id == INCOME_SINK_ID) {
            self.categories.push(Category {
                id: INCOME_SINK_ID,
                name: "Various Income".into(),
                kind: FlowKind::Income,
                parent_id: None,
            });
        }
    }

    /// Capture the current state as a serializable snapshot
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            transactions: self.transactions.clone(),
            categories: self.categories.clone(),
            goals: self.goals.clone(),
            accounts: self.accounts.clone(),
            rules: self.rules.clone(),
            version: DATA_STRUCTURE_VERSION,
        }
    }

    /// Replace the live collections with a restored snapshot and persist
    pub fn restore_snapshot(&mut self, snapshot: BookSnapshot, source: &str) {
        self.transactions = snapshot.transactions;
        self.categories = snapshot.categories;
        self.goals = snapshot.goals;
        self.accounts = snapshot.accounts;
        self.rules = snapshot.rules;
        self.ensure_sinks();
        self.sort_transactions();
        self.persist();
        let _ = self.audit.log(&AuditEntry::book_event(
            Operation::Restore,
            format!("Restored book from {}", source),
        ));
    }

    /// Write the full snapshot to the data file. Failures are appended to
    /// the audit log and swallowed; the session keeps its in-memory state.
    fn persist(&self) {
        if let Err(e) = write_json_atomic(self.paths.book_file(), &self.snapshot()) {
            let _ = self
                .audit
                .log(&AuditEntry::persist_failed(e.to_string()));
        }
    }

    fn sort_transactions(&mut self) {
        self.transactions
            .sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    }

    /// Paths this book was opened with
    pub fn paths(&self) -> &FinbookPaths {
        &self.paths
    }

    /// Audit logger for this book
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    // ----- accessors -----

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn rules(&self) -> &[AutomationRule] {
        &self.rules
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn get_category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn get_account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn get_rule(&self, id: RuleId) -> Option<&AutomationRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn get_goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Find a transaction by full id string or unique short-id prefix (the
    /// form the register displays)
    pub fn find_transaction(&self, identifier: &str) -> Option<&Transaction> {
        let trimmed = identifier.trim();
        if let Ok(id) = trimmed.parse::<TransactionId>() {
            if let Some(txn) = self.get_transaction(id) {
                return Some(txn);
            }
        }

        let fragment = trimmed.strip_prefix("txn-").unwrap_or(trimmed).to_lowercase();
        if fragment.is_empty() {
            return None;
        }
        let mut matches = self
            .transactions
            .iter()
            .filter(|t| t.id.as_uuid().simple().to_string().starts_with(&fragment));
        match (matches.next(), matches.next()) {
            (Some(txn), None) => Some(txn),
            _ => None,
        }
    }

    /// Find an account by display name (case-insensitive) or id string
    pub fn find_account(&self, identifier: &str) -> Option<&Account> {
        let lowered = identifier.trim().to_lowercase();
        if let Some(account) = self
            .accounts
            .iter()
            .find(|a| a.name.to_lowercase() == lowered)
        {
            return Some(account);
        }
        identifier
            .parse::<AccountId>()
            .ok()
            .and_then(|id| self.get_account(id))
    }

    /// Find a category by name (case-insensitive) or id string
    pub fn find_category(&self, identifier: &str) -> Option<&Category> {
        let lowered = identifier.trim().to_lowercase();
        if let Some(category) = self
            .categories
            .iter()
            .find(|c| c.name.to_lowercase() == lowered)
        {
            return Some(category);
        }
        identifier
            .parse::<CategoryId>()
            .ok()
            .and_then(|id| self.get_category(id))
    }

    /// Find a rule by keyword (case-insensitive) or id string
    pub fn find_rule(&self, identifier: &str) -> Option<&AutomationRule> {
        let lowered = identifier.trim().to_lowercase();
        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.keyword.to_lowercase() == lowered)
        {
            return Some(rule);
        }
        identifier
            .parse::<RuleId>()
            .ok()
            .and_then(|id| self.get_rule(id))
    }

    /// Find a goal by name (case-insensitive) or id string
    pub fn find_goal(&self, identifier: &str) -> Option<&Goal> {
        let lowered = identifier.trim().to_lowercase();
        if let Some(goal) = self.goals.iter().find(|g| g.name.to_lowercase() == lowered) {
            return Some(goal);
        }
        identifier
            .parse::<GoalId>()
            .ok()
            .and_then(|id| self.get_goal(id))
    }

    /// Names of all expense categories, sink excluded
    pub fn expense_category_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter(|c| c.kind == FlowKind::Expense && !c.is_sink())
            .map(|c| c.name.clone())
            .collect()
    }

    // ----- transactions -----

    /// Add a transaction. The referenced category and account must exist.
    pub fn add_transaction(&mut self, transaction: Transaction) -> FinbookResult<()> {
        transaction
            .validate()
            .map_err(FinbookError::Validation)?;
        self.require_category(transaction.category_id)?;
        self.require_account(transaction.account_id)?;

        let _ = self.audit.log(&AuditEntry::create(
            EntityType::Transaction,
            transaction.id.to_string(),
            Some(transaction.description.clone()),
            &transaction,
        ));
        self.transactions.push(transaction);
        self.sort_transactions();
        self.persist();
        Ok(())
    }

    /// Replace a transaction by id
    pub fn update_transaction(&mut self, transaction: Transaction) -> FinbookResult<()> {
        transaction
            .validate()
            .map_err(FinbookError::Validation)?;
        self.require_category(transaction.category_id)?;
        self.require_account(transaction.account_id)?;

        let position = self
            .transactions
            .iter()
            .position(|t| t.id == transaction.id)
            .ok_or_else(|| FinbookError::transaction_not_found(transaction.id.to_string()))?;

        let before = self.transactions[position].clone();
        let _ = self.audit.log(&AuditEntry::update(
            EntityType::Transaction,
            transaction.id.to_string(),
            Some(transaction.description.clone()),
            &before,
            &transaction,
            None,
        ));
        self.transactions[position] = transaction;
        self.sort_transactions();
        self.persist();
        Ok(())
    }

    /// Remove a transaction by id
    pub fn delete_transaction(&mut self, id: TransactionId) -> FinbookResult<()> {
        let position = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| FinbookError::transaction_not_found(id.to_string()))?;

        let removed = self.transactions.remove(position);
        let _ = self.audit.log(&AuditEntry::delete(
            EntityType::Transaction,
            id.to_string(),
            Some(removed.description.clone()),
            &removed,
        ));
        self.persist();
        Ok(())
    }

    /// Append a batch of transactions, deduplicating the whole collection by
    /// (date, normalized description, amount, account). The first instance
    /// of each key wins. The reported `imported` count is the number of
    /// records actually added after deduplication.
    pub fn import_transactions(&mut self, records: Vec<Transaction>) -> FinbookResult<ImportOutcome> {
        use std::collections::HashSet;

        let received = records.len();
        for record in &records {
            record.validate().map_err(FinbookError::Validation)?;
            self.require_category(record.category_id)?;
            self.require_account(record.account_id)?;
        }

        let mut seen: HashSet<_> = self.transactions.iter().map(|t| t.dedup_key()).collect();
        let mut imported = 0usize;
        for record in records {
            if seen.insert(record.dedup_key()) {
                self.transactions.push(record);
                imported += 1;
            }
        }

        self.sort_transactions();
        if imported > 0 {
            self.persist();
        }
        let outcome = ImportOutcome {
            received,
            imported,
            duplicates_skipped: received - imported,
        };
        let _ = self.audit.log(&AuditEntry::book_event(
            Operation::Import,
            format!(
                "Imported {} of {} records ({} duplicates skipped)",
                outcome.imported, outcome.received, outcome.duplicates_skipped
            ),
        ));
        Ok(outcome)
    }

    /// Re-run the rule matcher for the given transactions. A transaction is
    /// updated only when a rule matches and its target differs from the
    /// current category. Returns the number of transactions changed.
    pub fn reapply_rules(&mut self, ids: &[TransactionId]) -> FinbookResult<usize> {
        let mut updates = Vec::new();
        for (index, txn) in self.transactions.iter().enumerate() {
            if !ids.contains(&txn.id) {
                continue;
            }
            if let Some(category_id) = match_category(&txn.description, txn.kind, &self.rules) {
                if category_id != txn.category_id {
                    updates.push((index, category_id));
                }
            }
        }

        for &(index, category_id) in &updates {
            let before = self.transactions[index].clone();
            self.transactions[index].category_id = category_id;
            let _ = self.audit.log(&AuditEntry::update(
                EntityType::Transaction,
                before.id.to_string(),
                Some(before.description.clone()),
                &before,
                &self.transactions[index],
                Some("Recategorized by rule".to_string()),
            ));
        }

        if !updates.is_empty() {
            self.persist();
        }
        Ok(updates.len())
    }

    // ----- categories -----

    /// Add a category. Name must be non-blank and unique among siblings of
    /// the same kind (case-insensitive); a parent must exist and carry the
    /// same kind.
    pub fn add_category(
        &mut self,
        name: &str,
        kind: FlowKind,
        parent_id: Option<CategoryId>,
    ) -> FinbookResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FinbookError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        if let Some(parent_id) = parent_id {
            let parent = self
                .get_category(parent_id)
                .ok_or_else(|| FinbookError::category_not_found(parent_id.to_string()))?;
            if parent.kind != kind {
                return Err(FinbookError::Validation(format!(
                    "Parent category '{}' is {}, not {}",
                    parent.name, parent.kind, kind
                )));
            }
        }

        self.check_sibling_name(name, kind, parent_id, None)?;

        let category = match parent_id {
            Some(parent_id) => Category::with_parent(name, kind, parent_id),
            None => Category::new(name, kind),
        };
        let _ = self.audit.log(&AuditEntry::create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        ));
        self.categories.push(category.clone());
        self.persist();
        Ok(category)
    }

    /// Rename a category. Sinks cannot be renamed.
    pub fn update_category(&mut self, id: CategoryId, name: &str) -> FinbookResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FinbookError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        let category = self
            .get_category(id)
            .ok_or_else(|| FinbookError::category_not_found(id.to_string()))?;
        if category.is_sink() {
            return Err(FinbookError::Validation(
                "Reserved categories cannot be renamed".into(),
            ));
        }
        let kind = category.kind;
        let parent_id = category.parent_id;
        self.check_sibling_name(name, kind, parent_id, Some(id))?;

        let position = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| FinbookError::category_not_found(id.to_string()))?;
        let before = self.categories[position].clone();
        self.categories[position].name = name.to_string();
        let _ = self.audit.log(&AuditEntry::update(
            EntityType::Category,
            id.to_string(),
            Some(name.to_string()),
            &before,
            &self.categories[position],
            None,
        ));
        self.persist();
        Ok(())
    }

    /// Delete a category, reassigning everything that referenced it to the
    /// kind-appropriate sink. Sinks and categories with children cannot be
    /// deleted.
    pub fn delete_category(&mut self, id: CategoryId) -> FinbookResult<()> {
        let category = self
            .get_category(id)
            .ok_or_else(|| FinbookError::category_not_found(id.to_string()))?;
        if category.is_sink() {
            return Err(FinbookError::Validation(
                "Reserved categories cannot be deleted".into(),
            ));
        }
        if self.categories.iter().any(|c| c.parent_id == Some(id)) {
            return Err(FinbookError::Validation(format!(
                "Category '{}' has subcategories and cannot be deleted",
                category.name
            )));
        }

        let kind = category.kind;
        let sink = sink_for(kind);
        let removed = category.clone();

        for txn in self.transactions.iter_mut() {
            if txn.category_id == id {
                txn.category_id = sink;
            }
        }
        for rule in self.rules.iter_mut() {
            if rule.category_id == id {
                rule.category_id = sink;
            }
        }
        for goal in self.goals.iter_mut() {
            if goal.category_id == id {
                goal.category_id = sink;
            }
        }
        self.categories.retain(|c| c.id != id);

        let _ = self.audit.log(&AuditEntry::delete(
            EntityType::Category,
            id.to_string(),
            Some(removed.name.clone()),
            &removed,
        ));
        self.persist();
        Ok(())
    }

    /// Collect a category and all of its descendants, walking the tree with
    /// an explicit stack so arbitrarily deep (or accidentally cyclic) parent
    /// chains cannot overflow.
    pub fn category_with_descendants(&self, id: CategoryId) -> Vec<CategoryId> {
        use std::collections::HashSet;

        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            result.push(current);
            for category in &self.categories {
                if category.parent_id == Some(current) {
                    stack.push(category.id);
                }
            }
        }

        result
    }

    fn check_sibling_name(
        &self,
        name: &str,
        kind: FlowKind,
        parent_id: Option<CategoryId>,
        exclude: Option<CategoryId>,
    ) -> FinbookResult<()> {
        let lowered = name.to_lowercase();
        let duplicate = self.categories.iter().any(|c| {
            Some(c.id) != exclude
                && c.kind == kind
                && c.parent_id == parent_id
                && c.name.to_lowercase() == lowered
        });
        if duplicate {
            return Err(FinbookError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }
        Ok(())
    }

    fn require_category(&self, id: CategoryId) -> FinbookResult<()> {
        if self.get_category(id).is_none() {
            return Err(FinbookError::Validation(format!(
                "Referenced category {} does not exist",
                id
            )));
        }
        Ok(())
    }

    fn require_account(&self, id: AccountId) -> FinbookResult<()> {
        if self.get_account(id).is_none() {
            return Err(FinbookError::Validation(format!(
                "Referenced account {} does not exist",
                id
            )));
        }
        Ok(())
    }

    // ----- accounts -----

    /// Add an account
    pub fn add_account(&mut self, account: Account) -> FinbookResult<()> {
        account.validate().map_err(FinbookError::Validation)?;
        let _ = self.audit.log(&AuditEntry::create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        ));
        self.accounts.push(account);
        self.persist();
        Ok(())
    }

    /// Replace an account by id
    pub fn update_account(&mut self, account: Account) -> FinbookResult<()> {
        account.validate().map_err(FinbookError::Validation)?;
        let position = self
            .accounts
            .iter()
            .position(|a| a.id == account.id)
            .ok_or_else(|| FinbookError::account_not_found(account.id.to_string()))?;

        let before = self.accounts[position].clone();
        let _ = self.audit.log(&AuditEntry::update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
            None,
        ));
        self.accounts[position] = account;
        self.persist();
        Ok(())
    }

    /// Delete an account. Blocked while any transaction references it.
    pub fn delete_account(&mut self, id: AccountId) -> FinbookResult<()> {
        let position = self
            .accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| FinbookError::account_not_found(id.to_string()))?;

        let referencing = self
            .transactions
            .iter()
            .filter(|t| t.account_id == id)
            .count();
        if referencing > 0 {
            return Err(FinbookError::Validation(format!(
                "Account '{}' has {} transactions and cannot be deleted",
                self.accounts[position].name, referencing
            )));
        }

        let removed = self.accounts.remove(position);
        let _ = self.audit.log(&AuditEntry::delete(
            EntityType::Account,
            id.to_string(),
            Some(removed.name.clone()),
            &removed,
        ));
        self.persist();
        Ok(())
    }

    // ----- rules -----

    /// Add a rule. Keywords are unique case-insensitively; the target
    /// category must exist and carry the rule's kind.
    pub fn add_rule(&mut self, rule: AutomationRule) -> FinbookResult<()> {
        rule.validate().map_err(FinbookError::Validation)?;
        self.check_rule_keyword(&rule.keyword, None)?;
        self.check_rule_target(&rule)?;

        let _ = self.audit.log(&AuditEntry::create(
            EntityType::Rule,
            rule.id.to_string(),
            Some(rule.keyword.clone()),
            &rule,
        ));
        self.rules.push(rule);
        self.persist();
        Ok(())
    }

    /// Replace a rule by id
    pub fn update_rule(&mut self, rule: AutomationRule) -> FinbookResult<()> {
        rule.validate().map_err(FinbookError::Validation)?;
        self.check_rule_keyword(&rule.keyword, Some(rule.id))?;
        self.check_rule_target(&rule)?;

        let position = self
            .rules
            .iter()
            .position(|r| r.id == rule.id)
            .ok_or_else(|| FinbookError::rule_not_found(rule.id.to_string()))?;

        let before = self.rules[position].clone();
        let _ = self.audit.log(&AuditEntry::update(
            EntityType::Rule,
            rule.id.to_string(),
            Some(rule.keyword.clone()),
            &before,
            &rule,
            None,
        ));
        self.rules[position] = rule;
        self.persist();
        Ok(())
    }

    /// Delete a rule by id
    pub fn delete_rule(&mut self, id: RuleId) -> FinbookResult<()> {
        let position = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| FinbookError::rule_not_found(id.to_string()))?;

        let removed = self.rules.remove(position);
        let _ = self.audit.log(&AuditEntry::delete(
            EntityType::Rule,
            id.to_string(),
            Some(removed.keyword.clone()),
            &removed,
        ));
        self.persist();
        Ok(())
    }

    fn check_rule_keyword(&self, keyword: &str, exclude: Option<RuleId>) -> FinbookResult<()> {
        let lowered = keyword.trim().to_lowercase();
        let duplicate = self
            .rules
            .iter()
            .any(|r| Some(r.id) != exclude && r.keyword.trim().to_lowercase() == lowered);
        if duplicate {
            return Err(FinbookError::Duplicate {
                entity_type: "Rule",
                identifier: keyword.to_string(),
            });
        }
        Ok(())
    }

    fn check_rule_target(&self, rule: &AutomationRule) -> FinbookResult<()> {
        let category = self
            .get_category(rule.category_id)
            .ok_or_else(|| FinbookError::category_not_found(rule.category_id.to_string()))?;
        if category.kind != rule.kind {
            return Err(FinbookError::Validation(format!(
                "Rule is {} but target category '{}' is {}",
                rule.kind, category.name, category.kind
            )));
        }
        Ok(())
    }

    // ----- goals -----

    /// Add a goal. Target must be positive and the category must exist.
    pub fn add_goal(&mut self, goal: Goal) -> FinbookResult<()> {
        goal.validate().map_err(FinbookError::Validation)?;
        self.require_category(goal.category_id)?;

        let _ = self.audit.log(&AuditEntry::create(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        ));
        self.goals.push(goal);
        self.persist();
        Ok(())
    }

    /// Replace a goal by id
    pub fn update_goal(&mut self, goal: Goal) -> FinbookResult<()> {
        goal.validate().map_err(FinbookError::Validation)?;
        self.require_category(goal.category_id)?;

        let position = self
            .goals
            .iter()
            .position(|g| g.id == goal.id)
            .ok_or_else(|| FinbookError::goal_not_found(goal.id.to_string()))?;

        let before = self.goals[position].clone();
        let _ = self.audit.log(&AuditEntry::update(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &before,
            &goal,
            None,
        ));
        self.goals[position] = goal;
        self.persist();
        Ok(())
    }

    /// Delete a goal by id
    pub fn delete_goal(&mut self, id: GoalId) -> FinbookResult<()> {
        let position = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| FinbookError::goal_not_found(id.to_string()))?;

        let removed = self.goals.remove(position);
        let _ = self.audit.log(&AuditEntry::delete(
            EntityType::Goal,
            id.to_string(),
            Some(removed.name.clone()),
            &removed,
        ));
        self.persist();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn open_test_book() -> (BudgetBook, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let book = BudgetBook::open(paths).unwrap();
        (book, temp_dir)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn txn(
        _book: &BudgetBook,
        day: &str,
        description: &str,
        cents: i64,
        account_id: AccountId,
    ) -> Transaction {
        let kind = FlowKind::from_signed(Money::from_cents(cents));
        Transaction::new(
            date(day),
            description,
            Money::from_cents(cents).abs(),
            kind,
            sink_for(kind),
            account_id,
        )
    }

    fn add_account(book: &mut BudgetBook) -> AccountId {
        let account = Account::new("Test Bank", "Checking");
        let id = account.id;
        book.add_account(account).unwrap();
        id
    }

    #[test]
    fn test_fresh_book_has_sinks() {
        let (book, _temp) = open_test_book();
        assert!(book.get_category(EXPENSE_SINK_ID).is_some());
        assert!(book.get_category(INCOME_SINK_ID).is_some());
    }

    #[test]
    fn test_add_transaction_requires_account() {
        let (mut book, _temp) = open_test_book();
        let orphan = txn(&book, "2024-03-01", "No account", -500, AccountId::new());
        let err = book.add_transaction(orphan).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_transactions_sorted_date_descending() {
        let (mut book, _temp) = open_test_book();
        let account_id = add_account(&mut book);

        book.add_transaction(txn(&book, "2024-03-01", "older", -100, account_id))
            .unwrap();
        book.add_transaction(txn(&book, "2024-03-15", "newer", -200, account_id))
            .unwrap();

        assert_eq!(book.transactions()[0].description, "newer");
        assert_eq!(book.transactions()[1].description, "older");
    }

    #[test]
    fn test_open_writes_fresh_book_to_disk() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        let book = BudgetBook::open(paths.clone()).unwrap();
        assert!(book.paths().book_file().exists());

        let reopened = BudgetBook::open(paths).unwrap();
        assert_eq!(reopened.categories().len(), book.categories().len());
    }

    #[test]
    fn test_book_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().to_path_buf();

        {
            let mut book = BudgetBook::open(FinbookPaths::with_base_dir(base.clone())).unwrap();
            let account_id = add_account(&mut book);
            book.add_transaction(txn(&book, "2024-03-01", "persisted", -4530, account_id))
                .unwrap();
        }

        let reopened = BudgetBook::open(FinbookPaths::with_base_dir(base)).unwrap();
        assert_eq!(reopened.transactions().len(), 1);
        assert_eq!(reopened.transactions()[0].description, "persisted");
        assert_eq!(reopened.accounts().len(), 1);
    }

    #[test]
    fn test_add_category_duplicate_sibling_rejected() {
        let (mut book, _temp) = open_test_book();
        book.add_category("Food", FlowKind::Expense, None).unwrap();
        let err = book
            .add_category("  food ", FlowKind::Expense, None)
            .unwrap_err();
        assert!(matches!(err, FinbookError::Duplicate { .. }));
    }

    #[test]
    fn test_seeded_category_names_count_as_siblings() {
        let (mut book, _temp) = open_test_book();
        let err = book
            .add_category("Subscriptions", FlowKind::Expense, None)
            .unwrap_err();
        assert!(matches!(err, FinbookError::Duplicate { .. }));
    }

    #[test]
    fn test_same_name_allowed_under_different_parents() {
        let (mut book, _temp) = open_test_book();
        let food = book.add_category("Food", FlowKind::Expense, None).unwrap();
        let home = book.add_category("Home", FlowKind::Expense, None).unwrap();
        book.add_category("Misc", FlowKind::Expense, Some(food.id))
            .unwrap();
        book.add_category("Misc", FlowKind::Expense, Some(home.id))
            .unwrap();
    }

    #[test]
    fn test_child_kind_must_match_parent() {
        let (mut book, _temp) = open_test_book();
        let food = book.add_category("Food", FlowKind::Expense, None).unwrap();
        let err = book
            .add_category("Bonus", FlowKind::Income, Some(food.id))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_sink_cannot_be_renamed_or_deleted() {
        let (mut book, _temp) = open_test_book();
        assert!(book
            .update_category(EXPENSE_SINK_ID, "Other")
            .unwrap_err()
            .is_validation());
        assert!(book
            .delete_category(INCOME_SINK_ID)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_delete_category_blocked_by_children() {
        let (mut book, _temp) = open_test_book();
        let food = book.add_category("Food", FlowKind::Expense, None).unwrap();
        book.add_category("Takeout", FlowKind::Expense, Some(food.id))
            .unwrap();

        let err = book.delete_category(food.id).unwrap_err();
        assert!(err.is_validation());
        assert!(book.get_category(food.id).is_some());
    }

    #[test]
    fn test_delete_category_reassigns_to_sink() {
        let (mut book, _temp) = open_test_book();
        let account_id = add_account(&mut book);
        let food = book.add_category("Food", FlowKind::Expense, None).unwrap();

        let mut spend = txn(&book, "2024-03-01", "Supermarket", -4530, account_id);
        spend.category_id = food.id;
        book.add_transaction(spend).unwrap();
        book.add_rule(AutomationRule::new("market", FlowKind::Expense, food.id))
            .unwrap();
        book.add_goal(Goal::new("Eat cheaper", Money::from_cents(10_000), food.id))
            .unwrap();

        book.delete_category(food.id).unwrap();

        assert_eq!(book.transactions()[0].category_id, EXPENSE_SINK_ID);
        assert_eq!(book.rules()[0].category_id, EXPENSE_SINK_ID);
        assert_eq!(book.goals()[0].category_id, EXPENSE_SINK_ID);
    }

    #[test]
    fn test_category_with_descendants_walks_deep_chains() {
        let (mut book, _temp) = open_test_book();
        let root = book.add_category("Root", FlowKind::Expense, None).unwrap();
        let mut parent = root.id;
        let mut all = vec![root.id];
        for i in 0..50 {
            let child = book
                .add_category(format!("Level {}", i).as_str(), FlowKind::Expense, Some(parent))
                .unwrap();
            all.push(child.id);
            parent = child.id;
        }

        let mut collected = book.category_with_descendants(root.id);
        collected.sort();
        all.sort();
        assert_eq!(collected, all);
    }

    #[test]
    fn test_delete_account_blocked_by_transactions() {
        let (mut book, _temp) = open_test_book();
        let account_id = add_account(&mut book);
        book.add_transaction(txn(&book, "2024-03-01", "keeps account alive", -100, account_id))
            .unwrap();

        let err = book.delete_account(account_id).unwrap_err();
        assert!(err.is_validation());

        book.delete_transaction(book.transactions()[0].id).unwrap();
        book.delete_account(account_id).unwrap();
        assert!(book.accounts().is_empty());
    }

    #[test]
    fn test_rule_duplicate_keyword_rejected() {
        let (mut book, _temp) = open_test_book();
        let subs = book.find_category("Subscriptions").unwrap().clone();
        book.add_rule(AutomationRule::new("netflix", FlowKind::Expense, subs.id))
            .unwrap();
        let err = book
            .add_rule(AutomationRule::new("NETFLIX", FlowKind::Expense, subs.id))
            .unwrap_err();
        assert!(matches!(err, FinbookError::Duplicate { .. }));
    }

    #[test]
    fn test_rule_kind_must_match_target_category() {
        let (mut book, _temp) = open_test_book();
        let subs = book.find_category("Subscriptions").unwrap().clone();
        let err = book
            .add_rule(AutomationRule::new("refund", FlowKind::Income, subs.id))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_update_rule_keeps_own_keyword() {
        let (mut book, _temp) = open_test_book();
        let subs = book.find_category("Subscriptions").unwrap().clone();
        book.add_rule(AutomationRule::new("netflix", FlowKind::Expense, subs.id))
            .unwrap();

        let mut rule = book.rules()[0].clone();
        rule.keyword = "Netflix".to_string();
        book.update_rule(rule).unwrap();
    }

    #[test]
    fn test_import_dedup_keeps_first_instance() {
        let (mut book, _temp) = open_test_book();
        let account_id = add_account(&mut book);

        let first = txn(&book, "2024-03-01", "Supermarket", -4530, account_id);
        let duplicate = txn(&book, "2024-03-01", "  SUPERMARKET ", -4530, account_id);
        let other = txn(&book, "2024-03-02", "Bakery", -450, account_id);

        let outcome = book
            .import_transactions(vec![first, duplicate, other])
            .unwrap();

        assert_eq!(outcome.received, 3);
        assert_eq!(outcome.imported, 2);
        assert_eq!(outcome.duplicates_skipped, 1);
        assert_eq!(book.transactions().len(), 2);
    }

    #[test]
    fn test_import_twice_stores_once() {
        let (mut book, _temp) = open_test_book();
        let account_id = add_account(&mut book);

        let record = txn(&book, "2024-03-01", "Supermarket", -4530, account_id);
        book.import_transactions(vec![record.clone()]).unwrap();
        let outcome = book.import_transactions(vec![record]).unwrap();

        assert_eq!(outcome.imported, 0);
        assert_eq!(outcome.duplicates_skipped, 1);
        assert_eq!(book.transactions().len(), 1);
    }

    #[test]
    fn test_reapply_rules_counts_changes_only() {
        let (mut book, _temp) = open_test_book();
        let account_id = add_account(&mut book);
        let subs = book.find_category("Subscriptions").unwrap().clone();
        book.add_rule(AutomationRule::new("netflix", FlowKind::Expense, subs.id))
            .unwrap();

        book.add_transaction(txn(&book, "2024-03-01", "NETFLIX.COM", -1299, account_id))
            .unwrap();
        book.add_transaction(txn(&book, "2024-03-02", "Supermarket", -4530, account_id))
            .unwrap();

        let ids: Vec<_> = book.transactions().iter().map(|t| t.id).collect();
        let changed = book.reapply_rules(&ids).unwrap();

        assert_eq!(changed, 1);
        let netflix = book
            .transactions()
            .iter()
            .find(|t| t.description == "NETFLIX.COM")
            .unwrap();
        assert_eq!(netflix.category_id, subs.id);

        // Second pass finds nothing left to change
        assert_eq!(book.reapply_rules(&ids).unwrap(), 0);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (mut book, _temp) = open_test_book();
        let account_id = add_account(&mut book);
        book.add_transaction(txn(&book, "2024-03-01", "Supermarket", -4530, account_id))
            .unwrap();

        let snapshot = book.snapshot();
        let encoded = serde_json::to_value(&snapshot).unwrap();
        let restored = migrate::migrate(encoded).unwrap();

        assert_eq!(restored.transactions.len(), snapshot.transactions.len());
        assert_eq!(restored.transactions[0].id, snapshot.transactions[0].id);
        assert_eq!(restored.categories.len(), snapshot.categories.len());
        assert_eq!(restored.version, snapshot.version);
    }

    #[test]
    fn test_mutations_are_audited() {
        let (mut book, _temp) = open_test_book();
        add_account(&mut book);
        let entries = book.audit().read_all().unwrap();
        assert!(entries
            .iter()
            .any(|e| e.operation == Operation::Create && e.entity_type == EntityType::Account));
    }
}
