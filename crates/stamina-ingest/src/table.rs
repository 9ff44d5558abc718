use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use stamina_standards::csv_utils::delimiter_byte;
use tracing::debug;

/// Layout of a delimited file.
#[derive(Debug, Clone, Deserialize)]
pub struct TableFormat {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Whether the first row after `skip_rows` holds column names.
    #[serde(default = "default_true")]
    pub has_header: bool,
    /// Leading rows to ignore (titles, notes) before the header or data.
    #[serde(default)]
    pub skip_rows: usize,
}

fn default_delimiter() -> char {
    ','
}

fn default_true() -> bool {
    true
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            has_header: true,
            skip_rows: 0,
        }
    }
}

impl TableFormat {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn without_header(mut self) -> Self {
        self.has_header = false;
        self
    }

    #[must_use]
    pub fn skipping(mut self, rows: usize) -> Self {
        self.skip_rows = rows;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DelimitedTable {
    /// Empty when the format has no header row.
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DelimitedTable {
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map_or("", String::as_str)
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Reads a delimited file, dropping fully blank rows.
pub fn read_table(path: &Path, format: &TableFormat) -> Result<DelimitedTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter_byte(format.delimiter))
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;

    let mut raw_rows = Vec::new();
    for record in reader.records().skip(format.skip_rows) {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        raw_rows.push(row);
    }

    let mut rows = raw_rows.into_iter();
    let headers = if format.has_header {
        rows.next()
            .map(|row| row.iter().map(|h| normalize_header(h)).collect())
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    let rows: Vec<Vec<String>> = rows.collect();
    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "table read"
    );
    Ok(DelimitedTable { headers, rows })
}
