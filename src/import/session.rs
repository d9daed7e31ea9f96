//! Import staging session
//!
//! An import runs as a small state machine: Upload (waiting for input),
//! Mapping (tabular input loaded, columns being assigned), Review (rows
//! staged, editable). Confirming promotes the staged records into the book
//! and resets the session; cancelling resets without touching the book.
//!
//! Rows that fail to parse are never silently dropped. They are collected
//! as [`RejectedRow`]s and surfaced alongside the staged records; only
//! valid rows can be confirmed.

use chrono::NaiveDate;

use crate::error::{FinbookError, FinbookResult};
use crate::extract::{DescriptionItem, ExtractedRecord, StatementExtractor};
use crate::models::{
    sink_for, AccountId, AutomationRule, CategoryId, FlowKind, Money, Transaction,
    EXPENSE_SINK_ID,
};
use crate::rules::match_category;
use crate::store::{BudgetBook, ImportOutcome};

use super::mapping::{detect_mapping, ColumnMapping};
use super::parse::{parse_amount, parse_date};

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    /// Waiting for input
    Upload,
    /// Tabular rows loaded, column mapping under adjustment
    Mapping,
    /// Records staged and editable
    Review,
}

/// A parsed row awaiting confirmation. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedTransaction {
    /// 1-based source row number
    pub row_number: usize,
    pub date: NaiveDate,
    pub description: String,
    /// Absolute amount; direction lives in `kind`
    pub amount: Money,
    pub kind: FlowKind,
    /// Tentative category: the kind's sink unless a rule matched
    pub category_id: CategoryId,
    pub account_id: AccountId,
}

/// A row that failed staging, kept for the user to see
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// 1-based source row number
    pub row_number: usize,
    /// The raw cells as received
    pub raw: Vec<String>,
    pub reason: String,
}

/// Partial update for a staged record
#[derive(Debug, Clone, Default)]
pub struct StagedPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub kind: Option<FlowKind>,
    pub category_id: Option<CategoryId>,
}

/// One in-flight import
pub struct ImportSession {
    account_id: AccountId,
    stage: ImportStage,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    mapping: ColumnMapping,
    staged: Vec<StagedTransaction>,
    rejected: Vec<RejectedRow>,
}

impl ImportSession {
    /// Start a session importing into the given account
    pub fn begin(account_id: AccountId) -> Self {
        Self {
            account_id,
            stage: ImportStage::Upload,
            headers: Vec::new(),
            rows: Vec::new(),
            mapping: ColumnMapping::default(),
            staged: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn stage_name(&self) -> ImportStage {
        self.stage
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn staged(&self) -> &[StagedTransaction] {
        &self.staged
    }

    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    fn expect_stage(&self, expected: ImportStage, action: &str) -> FinbookResult<()> {
        if self.stage != expected {
            return Err(FinbookError::Import(format!(
                "Cannot {} in the {:?} stage",
                action, self.stage
            )));
        }
        Ok(())
    }

    /// Load tabular input: a header row plus data rows of raw cells.
    /// Moves to Mapping with a heuristic pre-filled column assignment.
    pub fn load_rows(&mut self, headers: Vec<String>, rows: Vec<Vec<String>>) -> FinbookResult<()> {
        self.expect_stage(ImportStage::Upload, "load rows")?;
        if rows.is_empty() {
            return Err(FinbookError::Import("No data rows to import".to_string()));
        }
        self.mapping = detect_mapping(&headers);
        self.headers = headers;
        self.rows = rows;
        self.stage = ImportStage::Mapping;
        Ok(())
    }

    /// Replace the column assignment. The mapping must be complete and
    /// its columns distinct.
    pub fn set_mapping(&mut self, mapping: ColumnMapping) -> FinbookResult<()> {
        self.expect_stage(ImportStage::Mapping, "set the mapping")?;
        mapping.validate()?;
        self.mapping = mapping;
        Ok(())
    }

    /// Convert every loaded row using the current mapping and move to
    /// Review. Unparseable rows land in the rejected list.
    pub fn stage(&mut self, rules: &[AutomationRule]) -> FinbookResult<()> {
        self.expect_stage(ImportStage::Mapping, "stage rows")?;
        let (date_col, description_col, amount_col) = self.mapping.validate()?;

        let rows = std::mem::take(&mut self.rows);
        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 1;
            let cell = |col: usize| row.get(col).map(String::as_str).unwrap_or("");
            match stage_fields(
                cell(date_col),
                cell(description_col),
                cell(amount_col),
                self.account_id,
                rules,
                row_number,
            ) {
                Ok(staged) => self.staged.push(staged),
                Err(reason) => self.rejected.push(RejectedRow {
                    row_number,
                    raw: row.clone(),
                    reason,
                }),
            }
        }

        self.stage = ImportStage::Review;
        Ok(())
    }

    /// Load pre-extracted records (from the statement-extraction boundary),
    /// skipping the Mapping stage entirely.
    pub fn load_extracted(
        &mut self,
        records: Vec<ExtractedRecord>,
        rules: &[AutomationRule],
    ) -> FinbookResult<()> {
        self.expect_stage(ImportStage::Upload, "load extracted records")?;
        if records.is_empty() {
            return Err(FinbookError::Import("No extracted records".to_string()));
        }

        for (index, record) in records.iter().enumerate() {
            let row_number = index + 1;
            match stage_fields(
                &record.date,
                &record.description,
                &record.amount,
                self.account_id,
                rules,
                row_number,
            ) {
                Ok(staged) => self.staged.push(staged),
                Err(reason) => self.rejected.push(RejectedRow {
                    row_number,
                    raw: vec![
                        record.date.clone(),
                        record.description.clone(),
                        record.amount.clone(),
                    ],
                    reason,
                }),
            }
        }

        self.stage = ImportStage::Review;
        Ok(())
    }

    /// Apply a partial edit to one staged record
    pub fn edit_staged(&mut self, index: usize, patch: StagedPatch) -> FinbookResult<()> {
        self.expect_stage(ImportStage::Review, "edit staged records")?;
        let staged = self.staged.get_mut(index).ok_or_else(|| {
            FinbookError::Import(format!("No staged record at index {}", index))
        })?;

        if let Some(date) = patch.date {
            staged.date = date;
        }
        if let Some(description) = patch.description {
            if description.trim().is_empty() {
                return Err(FinbookError::Validation(
                    "Description cannot be empty".into(),
                ));
            }
            staged.description = description;
        }
        if let Some(amount) = patch.amount {
            staged.amount = amount.abs();
        }
        if let Some(kind) = patch.kind {
            staged.kind = kind;
        }
        if let Some(category_id) = patch.category_id {
            staged.category_id = category_id;
        }
        Ok(())
    }

    /// Ask the categorization boundary to suggest categories for the
    /// expense records still sitting at the expense sink. Returned names
    /// are applied by name match against the book's expense categories;
    /// unknown names are ignored. Returns the number of records updated.
    pub fn ai_categorize(
        &mut self,
        extractor: &dyn StatementExtractor,
        book: &BudgetBook,
    ) -> FinbookResult<usize> {
        self.expect_stage(ImportStage::Review, "request categorization")?;

        let items: Vec<DescriptionItem> = self
            .staged
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind == FlowKind::Expense && s.category_id == EXPENSE_SINK_ID)
            .map(|(index, s)| DescriptionItem {
                id: index,
                description: s.description.clone(),
            })
            .collect();
        if items.is_empty() {
            return Ok(0);
        }

        let names = book.expense_category_names();
        let assignments = extractor.categorize(&items, &names)?;

        let mut applied = 0usize;
        for assignment in assignments {
            let Some(staged) = self.staged.get_mut(assignment.id) else {
                continue;
            };
            let lowered = assignment.category_name.trim().to_lowercase();
            let category = book
                .categories()
                .iter()
                .find(|c| c.kind == FlowKind::Expense && c.name.to_lowercase() == lowered);
            if let Some(category) = category {
                staged.category_id = category.id;
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Promote every staged record into the book. Returns the import
    /// outcome together with the rows that were rejected during staging.
    /// The session resets to Upload.
    pub fn confirm(
        &mut self,
        book: &mut BudgetBook,
    ) -> FinbookResult<(ImportOutcome, Vec<RejectedRow>)> {
        self.expect_stage(ImportStage::Review, "confirm")?;

        let records: Vec<Transaction> = self
            .staged
            .iter()
            .map(|s| {
                Transaction::new(
                    s.date,
                    s.description.clone(),
                    s.amount,
                    s.kind,
                    s.category_id,
                    s.account_id,
                )
            })
            .collect();

        let outcome = book.import_transactions(records)?;
        let rejected = std::mem::take(&mut self.rejected);
        self.reset();
        Ok((outcome, rejected))
    }

    /// Discard everything; the book is not touched
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.stage = ImportStage::Upload;
        self.headers.clear();
        self.rows.clear();
        self.mapping = ColumnMapping::default();
        self.staged.clear();
        self.rejected.clear();
    }
}

/// Parse one row's fields into a staged record. The error is the rejection
/// reason, not a hard failure.
fn stage_fields(
    date_raw: &str,
    description_raw: &str,
    amount_raw: &str,
    account_id: AccountId,
    rules: &[AutomationRule],
    row_number: usize,
) -> Result<StagedTransaction, String> {
    let description = description_raw.trim();
    if description.is_empty() {
        return Err("Description is empty".to_string());
    }

    let date = parse_date(date_raw).map_err(|e| e.to_string())?;
    let signed = parse_amount(amount_raw).map_err(|e| e.to_string())?;
    let kind = FlowKind::from_signed(signed);

    let category_id =
        match_category(description, kind, rules).unwrap_or_else(|| sink_for(kind));

    Ok(StagedTransaction {
        row_number,
        date,
        description: description.to_string(),
        amount: signed.abs(),
        kind,
        category_id,
        account_id,
    })
}
