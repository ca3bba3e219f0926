//! Shaping of raw value grids into keyed rows.
//!
//! The retrieval collaborator hands over either a rectangular value grid
//! (header row first, as a spreadsheet range read returns it) or rows
//! already serialized as JSON objects. Both adapters produce the `RawRow`
//! shape the enricher consumes.

use crate::error::Result;
use crate::schema::RawRow;

/// Converts a value grid into keyed rows using the first row as the header.
///
/// Headers and cells are trimmed; rows whose cells are all empty are
/// dropped; a short row maps its missing trailing cells to empty strings. A
/// grid without at least a header and one data row yields no rows.
pub fn grid_to_rows(values: &[Vec<String>]) -> Vec<RawRow> {
    if values.len() < 2 {
        return Vec::new();
    }

    let headers: Vec<String> = values[0].iter().map(|h| h.trim().to_string()).collect();

    values[1..]
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let cell = row.get(i).map(|c| c.trim().to_string()).unwrap_or_default();
                    (header.clone(), cell)
                })
                .collect()
        })
        .collect()
}

/// Deserializes rows transported as a JSON array of string-to-string objects.
pub fn rows_from_json(raw: &str) -> Result<Vec<RawRow>> {
    Ok(serde_json::from_str(raw)?)
}
