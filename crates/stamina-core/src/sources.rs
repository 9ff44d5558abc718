//! Where a job's input records come from.
//!
//! Sources are loaded when their job runs, so an unreadable file fails only
//! that job.

use std::path::PathBuf;

use anyhow::Result;
use stamina_ingest::{
    CorrespondenceColumns, ItemColumns, LabelColumns, TableFormat, read_correspondences,
    read_items, read_labels,
};
use stamina_model::{CorrespondenceRecord, ItemRecord, LabelRecord};

pub trait RecordSource<T> {
    /// Human-readable origin, used in logs and reports.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Vec<T>>;
}

/// Records already in memory.
#[derive(Debug, Clone)]
pub struct InMemory<T> {
    name: String,
    records: Vec<T>,
}

impl<T> InMemory<T> {
    pub fn new(name: impl Into<String>, records: Vec<T>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl<T: Clone> RecordSource<T> for InMemory<T> {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> Result<Vec<T>> {
        Ok(self.records.clone())
    }
}

#[derive(Debug, Clone)]
pub struct CsvItems {
    pub path: PathBuf,
    pub format: TableFormat,
    pub columns: ItemColumns,
}

impl RecordSource<ItemRecord> for CsvItems {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<ItemRecord>> {
        read_items(&self.path, &self.format, &self.columns)
    }
}

#[derive(Debug, Clone)]
pub struct CsvLabels {
    pub path: PathBuf,
    pub format: TableFormat,
    pub columns: LabelColumns,
}

impl RecordSource<LabelRecord> for CsvLabels {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<LabelRecord>> {
        read_labels(&self.path, &self.format, &self.columns)
    }
}

#[derive(Debug, Clone)]
pub struct CsvCorrespondences {
    pub path: PathBuf,
    pub format: TableFormat,
    pub columns: CorrespondenceColumns,
}

impl RecordSource<CorrespondenceRecord> for CsvCorrespondences {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<CorrespondenceRecord>> {
        read_correspondences(&self.path, &self.format, &self.columns)
    }
}
