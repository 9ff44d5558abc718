#![deny(unsafe_code)]

pub mod builtin;
pub mod classifier;
pub mod config;
pub mod csv_utils;
pub mod error;
pub mod family;
pub mod naming;
pub mod paths;
pub mod registry;
pub mod sections;

pub use crate::builtin::{ISIC_SECTIONS, NACE_SECTIONS, NACE_SUBSECTIONS, builtin_families};
pub use crate::classifier::LevelClassifier;
pub use crate::config::{RefinementPolicy, StandardsConfig};
pub use crate::error::StandardsError;
pub use crate::family::{
    CompositeRange, DepthRule, FamilyRule, HistoricalRule, LevelDescriptor, ParentRule,
    VersionQualifier, VersionRule, VersionSelector,
};
pub use crate::naming::{NamingResolver, pluralize};
pub use crate::registry::{DEFAULT_BASE_URI, FamilyRegistry};
pub use crate::sections::{SectionTable, StructureColumns, load_section_table};
