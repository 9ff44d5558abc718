#![deny(unsafe_code)]

//! Scheme hierarchy building, graph sinks and batch assembly.

pub mod assembler;
pub mod error;
pub mod hierarchy;
pub mod sink;
pub mod sources;

pub use assembler::{
    BuildReport, CorrespondenceJob, Job, JobKind, JobOutcome, JobReport, SchemeAssembler,
    SchemeJob,
};
pub use error::CoreError;
pub use hierarchy::{HierarchyBuilder, HierarchyOutcome, LabelMerge};
pub use sink::{GraphSink, MemoryGraph, SinkError, SinkResult, write_correspondence, write_scheme};
pub use sources::{CsvCorrespondences, CsvItems, CsvLabels, InMemory, RecordSource};
