//! Small closed vocabularies shared by schemes and correspondences.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Kind of explanatory note attached to an item.
///
/// Notes are language tagged and carried through to the sink under the
/// property returned by [`NoteKind::property`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum NoteKind {
    /// General explanatory text.
    General,
    /// Central content of the item.
    CoreContent,
    /// Limit or additional content.
    AdditionalContent,
    /// Activities or products included.
    Inclusion,
    /// Activities or products excluded.
    Exclusion,
    /// Remarks on scope.
    Scope,
}

impl NoteKind {
    pub const ALL: [NoteKind; 6] = [
        NoteKind::General,
        NoteKind::CoreContent,
        NoteKind::AdditionalContent,
        NoteKind::Inclusion,
        NoteKind::Exclusion,
        NoteKind::Scope,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::General => "general",
            NoteKind::CoreContent => "coreContent",
            NoteKind::AdditionalContent => "additionalContent",
            NoteKind::Inclusion => "inclusion",
            NoteKind::Exclusion => "exclusion",
            NoteKind::Scope => "scope",
        }
    }

    /// Property name used when the note is handed to a graph sink.
    pub fn property(&self) -> &'static str {
        match self {
            NoteKind::General => "definition",
            NoteKind::CoreContent => "coreContentNote",
            NoteKind::AdditionalContent => "additionalContentNote",
            NoteKind::Inclusion => "inclusionNote",
            NoteKind::Exclusion => "exclusionNote",
            NoteKind::Scope => "scopeNote",
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteKind {
    type Err = ModelError;

    /// Accepts the canonical names case-insensitively, plus the column
    /// names found in published explanatory-note tables.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "general" | "definition" => Ok(NoteKind::General),
            "corecontent" | "core_content" | "central_content" => Ok(NoteKind::CoreContent),
            "additionalcontent" | "additional_content" | "limit_content" => {
                Ok(NoteKind::AdditionalContent)
            }
            "inclusion" | "inclusions" => Ok(NoteKind::Inclusion),
            "exclusion" | "exclusions" => Ok(NoteKind::Exclusion),
            "scope" | "remark" | "remarks" => Ok(NoteKind::Scope),
            _ => Err(ModelError::UnknownNoteKind(s.to_string())),
        }
    }
}

/// Semantic relation carried by an association.
///
/// Narrow and broad are read from source to target:
/// `NarrowFromSourceToTarget` means the source item is narrower than the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchKind {
    Exact,
    NarrowFromSourceToTarget,
    BroadFromSourceToTarget,
    Close,
    Unspecified,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::NarrowFromSourceToTarget => "narrowFromSourceToTarget",
            MatchKind::BroadFromSourceToTarget => "broadFromSourceToTarget",
            MatchKind::Close => "close",
            MatchKind::Unspecified => "unspecified",
        }
    }

    /// The same relation read from target to source.
    pub fn inverse(self) -> Self {
        match self {
            MatchKind::NarrowFromSourceToTarget => MatchKind::BroadFromSourceToTarget,
            MatchKind::BroadFromSourceToTarget => MatchKind::NarrowFromSourceToTarget,
            other => other,
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchKind::Exact),
            "narrow" | "narrowfromsourcetotarget" => Ok(MatchKind::NarrowFromSourceToTarget),
            "broad" | "broadfromsourcetotarget" => Ok(MatchKind::BroadFromSourceToTarget),
            "close" => Ok(MatchKind::Close),
            "unspecified" | "" => Ok(MatchKind::Unspecified),
            _ => Err(ModelError::UnknownMatchKind(s.to_string())),
        }
    }
}

/// One end of a correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Source => Side::Target,
            Side::Target => Side::Source,
        }
    }
}
