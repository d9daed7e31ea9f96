//! Statement extraction and categorization boundary
//!
//! An external text-extraction service turns free text into transaction
//! candidates and suggests categories for batches of descriptions. The
//! service itself is a black box behind [`StatementExtractor`]; this module
//! only defines the exchange types and the response-document parsers. A
//! malformed response is a recoverable parse error, never a crash.

use serde::{Deserialize, Serialize};

use crate::error::{FinbookError, FinbookResult};

/// A transaction candidate extracted from free text. All fields are raw
/// strings; parsing happens in the import pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub date: String,
    pub description: String,
    pub amount: String,
}

/// One description sent out for categorization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionItem {
    pub id: usize,
    pub description: String,
}

/// One category suggestion coming back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAssignment {
    pub id: usize,
    #[serde(rename = "categoryName")]
    pub category_name: String,
}

/// External statement-processing service
///
/// Implementations wrap whatever transport the deployment uses. Tests use
/// an in-memory fake.
pub trait StatementExtractor {
    /// Extract transaction candidates from free-form statement text
    fn extract_transactions(&self, text: &str) -> FinbookResult<Vec<ExtractedRecord>>;

    /// Suggest a category for each description, choosing from the given
    /// category names
    fn categorize(
        &self,
        items: &[DescriptionItem],
        category_names: &[String],
    ) -> FinbookResult<Vec<CategoryAssignment>>;
}

/// Parse a raw extraction response document
///
/// The expected shape is a JSON array of `{date, description, amount}`
/// objects. Anything else is a `Parse` error.
pub fn parse_extraction_response(raw: &str) -> FinbookResult<Vec<ExtractedRecord>> {
    serde_json::from_str(raw).map_err(|e| {
        FinbookError::Parse(format!(
            "Extraction response does not match the expected schema: {}",
            e
        ))
    })
}

/// Parse a raw categorization response document
///
/// The expected shape is a JSON array of `{id, categoryName}` objects.
pub fn parse_categorization_response(raw: &str) -> FinbookResult<Vec<CategoryAssignment>> {
    serde_json::from_str(raw).map_err(|e| {
        FinbookError::Parse(format!(
            "Categorization response does not match the expected schema: {}",
            e
        ))
    })
}
