//! Column mapping for tabular imports
//!
//! The first row of a tabular file is treated as headers; the mapping names
//! which column holds the date, description, and amount. A heuristic
//! pre-fill matches common header keywords so the user usually only
//! confirms.

use crate::error::{FinbookError, FinbookResult};

/// Assignment of row columns to transaction fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Index of the date column
    pub date: Option<usize>,
    /// Index of the description column
    pub description: Option<usize>,
    /// Index of the amount column
    pub amount: Option<usize>,
}

impl ColumnMapping {
    /// Explicit mapping with all three columns assigned
    pub fn new(date: usize, description: usize, amount: usize) -> Self {
        Self {
            date: Some(date),
            description: Some(description),
            amount: Some(amount),
        }
    }

    /// All three required columns must be assigned and distinct
    pub fn validate(&self) -> FinbookResult<(usize, usize, usize)> {
        let date = self
            .date
            .ok_or_else(|| FinbookError::Validation("No date column assigned".into()))?;
        let description = self
            .description
            .ok_or_else(|| FinbookError::Validation("No description column assigned".into()))?;
        let amount = self
            .amount
            .ok_or_else(|| FinbookError::Validation("No amount column assigned".into()))?;

        if date == description || date == amount || description == amount {
            return Err(FinbookError::Validation(
                "Date, description and amount must be distinct columns".into(),
            ));
        }

        Ok((date, description, amount))
    }
}

const DATE_HINTS: &[&str] = &["date", "datum", "booked", "buchung"];
const DESCRIPTION_HINTS: &[&str] = &[
    "description",
    "payee",
    "memo",
    "text",
    "narrative",
    "verwendungszweck",
    "reference",
];
const AMOUNT_HINTS: &[&str] = &["amount", "betrag", "value", "sum", "debit"];

/// Guess a mapping from header names
///
/// Case-insensitive substring match against common header keywords; the
/// first matching column per field wins, a column is never assigned twice.
pub fn detect_mapping(headers: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let mut claim = |slot: &mut Option<usize>, hints: &[&str], taken: &[Option<usize>]| {
        for (index, header) in lowered.iter().enumerate() {
            if taken.contains(&Some(index)) {
                continue;
            }
            if hints.iter().any(|hint| header.contains(hint)) {
                *slot = Some(index);
                return;
            }
        }
    };

    let mut date = None;
    claim(&mut date, DATE_HINTS, &[]);
    let mut description = None;
    claim(&mut description, DESCRIPTION_HINTS, &[date]);
    let mut amount = None;
    claim(&mut amount, AMOUNT_HINTS, &[date, description]);

    mapping.date = date;
    mapping.description = description;
    mapping.amount = amount;
    mapping
}
