#![deny(unsafe_code)]

//! Correspondence tables between classification versions.
//!
//! A [`CorrespondenceRule`] describes how one table is read; the
//! [`CorrespondenceBuilder`] turns its records into a
//! [`stamina_model::Correspondence`].

pub mod builder;
pub mod error;
pub mod rules;

pub use builder::{CorrespondenceBuilder, CorrespondenceOutcome};
pub use error::MapError;
pub use rules::{CodeDerivation, CorrespondenceRule, LinkExpansion, MatchRule, Orientation, PRESETS};
