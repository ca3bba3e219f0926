//! Best-effort coercion of raw sheet cells into numbers, dates and text.
//!
//! Source rows arrive as untyped strings with inconsistent formatting
//! (currency symbols, thousands separators, stray whitespace, several date
//! formats). Every function here degrades to a documented default instead of
//! returning an error: a malformed cell must never fail the caller.

use crate::schema::RawRow;
use chrono::NaiveDate;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Parses a monetary amount from a raw cell.
///
/// Strips `$`, whitespace and thousands-separator commas. A single trailing
/// decimal comma (one or two digits, no dot present) is normalized to a dot
/// before parsing. Unparsable, non-finite and negative inputs collapse to 0.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$')
        .collect();

    let normalized = match cleaned.rfind(',') {
        Some(pos)
            if cleaned.matches(',').count() == 1
                && !cleaned.contains('.')
                && (1..=2).contains(&(cleaned.len() - pos - 1)) =>
        {
            // Decimal comma: "12,50" -> "12.50"
            format!("{}.{}", &cleaned[..pos], &cleaned[pos + 1..])
        }
        _ => cleaned.replace(',', ""),
    };

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Returns the trimmed value of the first candidate key present with a
/// non-empty value.
///
/// This is the column-alias fallback chain used throughout enrichment: the
/// same logical field has carried several header spellings over the life of
/// the source sheet, and the first recognized one wins.
pub fn first_non_empty<'a>(row: &'a RawRow, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        let value = row.get(*key)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

/// Parses a calendar date from a raw cell, trying ISO first and the slash
/// formats the sheet has historically contained. Returns `None` on failure.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}
