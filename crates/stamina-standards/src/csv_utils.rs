//! Keyed CSV rows for structure tables.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

/// One data row, keyed by trimmed header name.
pub type KeyedRow = BTreeMap<String, String>;

/// Reads a delimited file with a header row into keyed rows.
///
/// Short rows are accepted; the missing cells are simply absent.
pub fn read_keyed_rows(path: &Path, delimiter: char) -> Result<Vec<KeyedRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter_byte(delimiter))
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open structure table {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("read header of {}", path.display()))?
        .iter()
        .map(|name| name.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    reader
        .records()
        .enumerate()
        .map(|(line, record)| -> Result<KeyedRow> {
            let record =
                record.with_context(|| format!("{} row {}", path.display(), line + 2))?;
            Ok(headers
                .iter()
                .cloned()
                .zip(record.iter().map(|value| value.trim().to_string()))
                .collect())
        })
        .collect()
}

/// Single-byte delimiter for the csv reader; non-ASCII falls back to a comma.
pub fn delimiter_byte(delimiter: char) -> u8 {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .unwrap_or(b',')
}

/// Non-empty cell value, `None` when blank or absent.
pub fn cell<'r>(row: &'r KeyedRow, column: &str) -> Option<&'r str> {
    row.get(column).map(String::as_str).filter(|v| !v.is_empty())
}
