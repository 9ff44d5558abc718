#![deny(unsafe_code)]

//! Readers turning delimited text files into the normalized input records
//! of `stamina-model`.

pub mod columns;
pub mod readers;
pub mod table;

pub use columns::ColumnRef;
pub use readers::{
    CorrespondenceColumns, ItemColumns, LabelColumns, parse_flag, read_correspondences,
    read_items, read_labels,
};
pub use table::{DelimitedTable, TableFormat, read_table};
