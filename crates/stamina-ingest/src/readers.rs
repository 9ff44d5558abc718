//! Record readers for classification, label and correspondence files.
//!
//! Column names that cannot be resolved are an error for the whole file.
//! Individual rows are passed through as read; deciding whether a code is
//! valid is left to the builders.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Result, bail};
use serde::Deserialize;
use stamina_model::{
    CorrespondenceRecord, DEFAULT_LANGUAGE, ItemRecord, LabelRecord, NoteKind,
};
use tracing::{debug, info};

use crate::columns::ColumnRef;
use crate::table::{DelimitedTable, TableFormat, read_table};

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_code() -> ColumnRef {
    ColumnRef::Index(0)
}

fn default_label() -> ColumnRef {
    ColumnRef::Index(1)
}

/// Columns of a classification population file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemColumns {
    #[serde(default = "default_code")]
    pub code: ColumnRef,
    #[serde(default = "default_label")]
    pub label: ColumnRef,
    #[serde(default)]
    pub parent: Option<ColumnRef>,
    #[serde(default)]
    pub notes: BTreeMap<NoteKind, ColumnRef>,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for ItemColumns {
    fn default() -> Self {
        Self {
            code: default_code(),
            label: default_label(),
            parent: None,
            notes: BTreeMap::new(),
            language: default_language(),
        }
    }
}

impl ItemColumns {
    pub fn new(code: impl Into<ColumnRef>, label: impl Into<ColumnRef>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_note(mut self, kind: NoteKind, column: impl Into<ColumnRef>) -> Self {
        self.notes.insert(kind, column.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, column: impl Into<ColumnRef>) -> Self {
        self.parent = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Columns of an additional-language label file.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelColumns {
    #[serde(default = "default_code")]
    pub code: ColumnRef,
    #[serde(default = "default_label")]
    pub label: ColumnRef,
    pub language: String,
}

impl LabelColumns {
    pub fn new(
        code: impl Into<ColumnRef>,
        label: impl Into<ColumnRef>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            language: language.into(),
        }
    }
}

/// Columns of a correspondence file.
///
/// `first`/`second` are read into source/target as they appear; whether the
/// first column really holds the source is decided by the correspondence
/// rule's orientation.
#[derive(Debug, Clone, Deserialize)]
pub struct CorrespondenceColumns {
    #[serde(default = "default_code")]
    pub first: ColumnRef,
    #[serde(default = "default_label")]
    pub second: ColumnRef,
    #[serde(default)]
    pub first_partial: Option<ColumnRef>,
    #[serde(default)]
    pub second_partial: Option<ColumnRef>,
    #[serde(default)]
    pub comment: Option<ColumnRef>,
}

impl Default for CorrespondenceColumns {
    fn default() -> Self {
        Self {
            first: default_code(),
            second: default_label(),
            first_partial: None,
            second_partial: None,
            comment: None,
        }
    }
}

impl CorrespondenceColumns {
    pub fn new(first: impl Into<ColumnRef>, second: impl Into<ColumnRef>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_partials(
        mut self,
        first: Option<ColumnRef>,
        second: Option<ColumnRef>,
    ) -> Self {
        self.first_partial = first;
        self.second_partial = second;
        self
    }

    #[must_use]
    pub fn with_comment(mut self, column: impl Into<ColumnRef>) -> Self {
        self.comment = Some(column.into());
        self
    }
}

/// Parses a partial-match flag: `true/false`, `1/0`, `yes/no`, `y/n`.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn resolve(path: &Path, table: &DelimitedTable, column: &ColumnRef) -> Result<usize> {
    match column.resolve(&table.headers) {
        Some(index) => Ok(index),
        None => bail!("missing column {column} in {}", path.display()),
    }
}

fn resolve_optional(
    path: &Path,
    table: &DelimitedTable,
    column: Option<&ColumnRef>,
) -> Result<Option<usize>> {
    column.map(|c| resolve(path, table, c)).transpose()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

pub fn read_items(path: &Path, format: &TableFormat, columns: &ItemColumns) -> Result<Vec<ItemRecord>> {
    let table = read_table(path, format)?;
    let code = resolve(path, &table, &columns.code)?;
    let label = resolve(path, &table, &columns.label)?;
    let parent = resolve_optional(path, &table, columns.parent.as_ref())?;
    let notes = columns
        .notes
        .iter()
        .map(|(kind, column)| Ok((*kind, resolve(path, &table, column)?)))
        .collect::<Result<Vec<_>>>()?;

    let records: Vec<ItemRecord> = (0..table.rows.len())
        .map(|row| {
            let mut record = ItemRecord::new(table.cell(row, code), table.cell(row, label))
                .with_language(columns.language.clone());
            record.parent = parent.and_then(|p| non_empty(table.cell(row, p)));
            for (kind, column) in &notes {
                if let Some(text) = non_empty(table.cell(row, *column)) {
                    record.notes.insert(*kind, text);
                }
            }
            record
        })
        .collect();
    info!(path = %path.display(), records = records.len(), "item records read");
    Ok(records)
}

pub fn read_labels(
    path: &Path,
    format: &TableFormat,
    columns: &LabelColumns,
) -> Result<Vec<LabelRecord>> {
    let table = read_table(path, format)?;
    let code = resolve(path, &table, &columns.code)?;
    let label = resolve(path, &table, &columns.label)?;
    let records: Vec<LabelRecord> = (0..table.rows.len())
        .filter(|row| !table.cell(*row, label).is_empty())
        .map(|row| {
            LabelRecord::new(
                table.cell(row, code),
                table.cell(row, label),
                columns.language.clone(),
            )
        })
        .collect();
    info!(
        path = %path.display(),
        language = %columns.language,
        records = records.len(),
        "label records read"
    );
    Ok(records)
}

pub fn read_correspondences(
    path: &Path,
    format: &TableFormat,
    columns: &CorrespondenceColumns,
) -> Result<Vec<CorrespondenceRecord>> {
    let table = read_table(path, format)?;
    let first = resolve(path, &table, &columns.first)?;
    let second = resolve(path, &table, &columns.second)?;
    let first_partial = resolve_optional(path, &table, columns.first_partial.as_ref())?;
    let second_partial = resolve_optional(path, &table, columns.second_partial.as_ref())?;
    let comment = resolve_optional(path, &table, columns.comment.as_ref())?;

    let flag = |row: usize, column: Option<usize>| {
        let column = column?;
        let value = table.cell(row, column);
        let parsed = parse_flag(value);
        if parsed.is_none() && !value.is_empty() {
            debug!(row, value = %value, "unrecognized partial flag");
        }
        parsed
    };

    let records: Vec<CorrespondenceRecord> = (0..table.rows.len())
        .map(|row| CorrespondenceRecord {
            source_code: table.cell(row, first).to_string(),
            target_code: table.cell(row, second).to_string(),
            source_partial: flag(row, first_partial),
            target_partial: flag(row, second_partial),
            comment: comment.and_then(|c| non_empty(table.cell(row, c))),
        })
        .collect();
    info!(path = %path.display(), records = records.len(), "correspondence records read");
    Ok(records)
}
