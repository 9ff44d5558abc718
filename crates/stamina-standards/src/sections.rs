//! Division to section lookup tables.
//!
//! Two-digit division codes carry no trace of their section letter, so the
//! parent of a division comes from a table. Tables are either built in
//! (NACE Rev. 2) or loaded once from a structure file before any build
//! starts; they are never modified afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Result, bail};
use tracing::debug;

use crate::csv_utils::{cell, read_keyed_rows};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionTable {
    sections: BTreeMap<String, String>,
}

impl SectionTable {
    /// Builds a table from one character per division, division 01 first.
    /// `unused` marks division numbers without a section.
    pub fn from_converter(converter: &str, unused: char) -> Self {
        let sections = converter
            .chars()
            .enumerate()
            .filter(|(_, section)| *section != unused)
            .map(|(index, section)| (format!("{:02}", index + 1), section.to_string()))
            .collect();
        Self { sections }
    }

    pub fn from_pairs<I, D, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (D, S)>,
        D: Into<String>,
        S: Into<String>,
    {
        Self {
            sections: pairs
                .into_iter()
                .map(|(division, section)| (division.into(), section.into()))
                .collect(),
        }
    }

    /// Section of `division`. `None` for unknown or malformed codes.
    pub fn section_for(&self, division: &str) -> Option<&str> {
        self.sections.get(division.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Column layout of a structure file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct StructureColumns {
    #[serde(default = "default_code_column")]
    pub code_column: String,
    #[serde(default = "default_parent_column")]
    pub parent_column: String,
    /// When set, only rows whose level column equals `level` are read.
    #[serde(default = "default_level_column")]
    pub level_column: Option<String>,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_code_column() -> String {
    "Level2".to_string()
}

fn default_parent_column() -> String {
    "Level1".to_string()
}

fn default_level_column() -> Option<String> {
    Some("CodeLevel".to_string())
}

fn default_level() -> String {
    "2".to_string()
}

fn default_delimiter() -> char {
    ','
}

impl Default for StructureColumns {
    fn default() -> Self {
        Self {
            code_column: default_code_column(),
            parent_column: default_parent_column(),
            level_column: default_level_column(),
            level: default_level(),
            delimiter: default_delimiter(),
        }
    }
}

/// Reads division/section pairs from a structure file.
///
/// Rows with an empty division or section are ignored.
pub fn load_section_table(path: &Path, columns: &StructureColumns) -> Result<SectionTable> {
    let rows = read_keyed_rows(path, columns.delimiter)?;
    if let Some(first) = rows.first() {
        for column in [&columns.code_column, &columns.parent_column] {
            if !first.contains_key(column) {
                bail!("missing column {column} in {}", path.display());
            }
        }
    }
    let mut sections = BTreeMap::new();
    for row in &rows {
        if let Some(level_column) = &columns.level_column
            && cell(row, level_column) != Some(columns.level.as_str())
        {
            continue;
        }
        let (Some(division), Some(section)) = (
            cell(row, &columns.code_column),
            cell(row, &columns.parent_column),
        ) else {
            continue;
        };
        sections.insert(division.to_string(), section.to_string());
    }
    debug!(
        path = %path.display(),
        divisions = sections.len(),
        "section table loaded"
    );
    Ok(SectionTable { sections })
}
