//! Transaction import pipeline
//!
//! Raw statement data (CSV files or records from the extraction boundary)
//! is staged in an [`ImportSession`], reviewed, and confirmed into the
//! book. Parsing helpers live in [`parse`], column handling in [`mapping`].

pub mod mapping;
pub mod parse;
pub mod session;

pub use mapping::{detect_mapping, ColumnMapping};
pub use session::{ImportSession, ImportStage, RejectedRow, StagedPatch, StagedTransaction};

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{FinbookError, FinbookResult};

/// Read a CSV file into a header row plus raw data rows
///
/// The first row is always treated as headers. Rows are kept as plain
/// string cells; all interpretation happens during staging.
pub fn read_csv_rows<P: AsRef<Path>>(path: P) -> FinbookResult<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path.as_ref())
        .map_err(|e| FinbookError::Import(format!("Failed to open CSV file: {}", e)))?;

    let headers = reader
        .headers()
        .map_err(|e| FinbookError::Import(format!("Failed to read CSV headers: {}", e)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| FinbookError::Import(format!("Failed to read CSV row: {}", e)))?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok((headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_csv_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("statement.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Date,Description,Amount").unwrap();
        writeln!(file, "2024-03-01,Supermarket,-45.30").unwrap();
        writeln!(file, "2024-03-02,\"Bakery, downtown\",-4.50").unwrap();

        let (headers, rows) = read_csv_rows(&path).unwrap();
        assert_eq!(headers, vec!["Date", "Description", "Amount"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "Bakery, downtown");
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv_rows("/no/such/file.csv").unwrap_err();
        assert!(matches!(err, FinbookError::Import(_)));
    }
}
