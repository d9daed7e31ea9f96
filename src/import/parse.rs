//! Field parsers for raw statement rows
//!
//! Statement exports disagree on almost everything: currency symbols,
//! grouping separators, decimal commas, slash dates. These parsers
//! normalize the common shapes; anything they cannot read becomes a
//! `Parse` error that the session surfaces as a rejected row.

use chrono::NaiveDate;

use crate::error::{FinbookError, FinbookResult};
use crate::models::Money;

/// Parse a raw amount string into signed `Money`
///
/// Normalization order: resolve accounting parentheses to a minus sign,
/// strip currency decoration from the edges, strip grouping separators,
/// normalize a decimal comma to a dot. Decoration is only accepted at the
/// edges ("$10.50", "12.00 EUR"); a stray letter or symbol inside the
/// number rejects the amount instead of silently dropping it.
pub fn parse_amount(raw: &str) -> FinbookResult<Money> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FinbookError::Parse("Amount is empty".to_string()));
    }

    let mut body = trimmed;
    let mut negative = false;

    if body.len() >= 2 && body.starts_with('(') && body.ends_with(')') {
        negative = true;
        body = body[1..body.len() - 1].trim();
    }

    // The sign may sit on either side of the currency token ("-€7,25",
    // "€-7,25"), so peel decoration and sign in alternation.
    let decoration = |c: char| c.is_alphabetic() || c.is_whitespace() || is_currency_symbol(c);
    for _ in 0..2 {
        body = body.trim_matches(decoration);
        if let Some(rest) = body.strip_prefix('-') {
            negative = true;
            body = rest;
        } else if let Some(rest) = body.strip_prefix('+') {
            body = rest;
        }
    }
    body = body.trim_matches(decoration);

    if body.is_empty() {
        return Err(FinbookError::Parse(format!(
            "Amount '{}' contains no digits",
            raw
        )));
    }
    if !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return Err(FinbookError::Parse(format!("Unparseable amount '{}'", raw)));
    }

    let normalized = normalize_separators(body);
    let amount = Money::parse(&normalized)
        .map_err(|_| FinbookError::Parse(format!("Unparseable amount '{}'", raw)))?;

    Ok(if negative { -amount } else { amount })
}

fn is_currency_symbol(c: char) -> bool {
    matches!(c, '$' | '€' | '£' | '¥' | '¢')
}

/// Resolve grouping and decimal separators to a plain dotted decimal
fn normalize_separators(cleaned: &str) -> String {
    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');

    match (last_dot, last_comma) {
        // Both present: the rightmost one is the decimal separator, the
        // other is grouping ("1.234,56" as well as "1,234.56").
        (Some(dot), Some(comma)) => {
            let decimal = if dot > comma { '.' } else { ',' };
            let mut result = String::with_capacity(cleaned.len());
            for (i, c) in cleaned.char_indices() {
                match c {
                    '.' | ',' if c == decimal && i == last_of(cleaned, decimal) => {
                        result.push('.')
                    }
                    '.' | ',' => {}
                    c => result.push(c),
                }
            }
            result
        }
        // Comma only: a single comma is a decimal comma ("4,50"); several
        // commas are grouping ("1,234,567").
        (None, Some(_)) => {
            if cleaned.matches(',').count() == 1 {
                cleaned.replacen(',', ".", 1)
            } else {
                cleaned.replace(',', "")
            }
        }
        // Dot only: a single dot is the decimal point; several dots are
        // grouping with the last one decimal ("1.234.567.89").
        (Some(_), None) => {
            if cleaned.matches('.').count() == 1 {
                cleaned.to_string()
            } else {
                let last = last_of(cleaned, '.');
                cleaned
                    .char_indices()
                    .filter(|&(i, c)| c != '.' || i == last)
                    .map(|(_, c)| c)
                    .collect()
            }
        }
        (None, None) => cleaned.to_string(),
    }
}

fn last_of(s: &str, target: char) -> usize {
    s.rfind(target).unwrap_or(usize::MAX)
}

/// Parse a raw date string
///
/// Accepts ISO `YYYY-MM-DD` directly; slash-delimited `DD/MM/YYYY` (and
/// `D/M/YYYY`) has its components reversed into ISO order before parsing.
pub fn parse_date(raw: &str) -> FinbookResult<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FinbookError::Parse("Date is empty".to_string()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    if trimmed.contains('/') {
        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.len() == 3 {
            let reversed = format!("{}-{}-{}", parts[2], parts[1], parts[0]);
            if let Ok(date) = NaiveDate::parse_from_str(&reversed, "%Y-%m-%d") {
                return Ok(date);
            }
        }
    }

    Err(FinbookError::Parse(format!("Unparseable date '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_plain() {
        assert_eq!(parse_amount("-45.30").unwrap().cents(), -4530);
        assert_eq!(parse_amount("12").unwrap().cents(), 1200);
        assert_eq!(parse_amount("+3.99").unwrap().cents(), 399);
    }

    #[test]
    fn test_parse_amount_currency_symbols() {
        assert_eq!(parse_amount("$10.50").unwrap().cents(), 1050);
        assert_eq!(parse_amount("-€7,25").unwrap().cents(), -725);
        assert_eq!(parse_amount("12.00 EUR").unwrap().cents(), 1200);
    }

    #[test]
    fn test_parse_amount_grouping() {
        assert_eq!(parse_amount("1,234.56").unwrap().cents(), 123_456);
        assert_eq!(parse_amount("1.234,56").unwrap().cents(), 123_456);
        assert_eq!(parse_amount("1,234,567").unwrap().cents(), 123_456_700);
    }

    #[test]
    fn test_parse_amount_decimal_comma() {
        assert_eq!(parse_amount("4,50").unwrap().cents(), 450);
    }

    #[test]
    fn test_parse_amount_accounting_parentheses() {
        assert_eq!(parse_amount("(45.30)").unwrap().cents(), -4530);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(parse_amount("").unwrap_err().is_parse());
        assert!(parse_amount("n/a").unwrap_err().is_parse());
        assert!(parse_amount("--").unwrap_err().is_parse());
    }

    #[test]
    fn test_parse_amount_rejects_letters_inside_number() {
        assert!(parse_amount("45x30").unwrap_err().is_parse());
        assert!(parse_amount("2 of 3").unwrap_err().is_parse());
        assert!(parse_amount("1,2e3").unwrap_err().is_parse());
    }

    #[test]
    fn test_parse_amount_sign_on_either_side_of_currency() {
        assert_eq!(parse_amount("€-7,25").unwrap().cents(), -725);
        assert_eq!(parse_amount("-12.00 EUR").unwrap().cents(), -1200);
    }

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date("2024-03-01").unwrap();
        assert_eq!(date.to_string(), "2024-03-01");
    }

    #[test]
    fn test_parse_date_slash_day_first() {
        let date = parse_date("01/03/2024").unwrap();
        assert_eq!(date.to_string(), "2024-03-01");

        let date = parse_date("9/3/2024").unwrap();
        assert_eq!(date.to_string(), "2024-03-09");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("").unwrap_err().is_parse());
        assert!(parse_date("yesterday").unwrap_err().is_parse());
        assert!(parse_date("31/02/2024").unwrap_err().is_parse());
    }
}
