//! Normalized input records consumed by the builders.
//!
//! Adapters reading spreadsheets, databases or delimited files produce these;
//! the builders never see the file layout.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::NoteKind;

/// Language assumed when a record does not carry one.
pub const DEFAULT_LANGUAGE: &str = "en";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// One classification item as read from a population source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub code: String,
    pub label: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub notes: BTreeMap<NoteKind, String>,
    /// Parent code given explicitly by the source, for families whose
    /// hierarchy is not encoded in the code itself.
    #[serde(default)]
    pub parent: Option<String>,
}

impl ItemRecord {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            language: default_language(),
            notes: BTreeMap::new(),
            parent: None,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn with_note(mut self, kind: NoteKind, text: impl Into<String>) -> Self {
        self.notes.insert(kind, text.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// An extra-language label for an item that already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub code: String,
    pub label: String,
    pub language: String,
}

impl LabelRecord {
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            language: language.into(),
        }
    }
}

/// One line of a correspondence table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrespondenceRecord {
    pub source_code: String,
    pub target_code: String,
    #[serde(default)]
    pub source_partial: Option<bool>,
    #[serde(default)]
    pub target_partial: Option<bool>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl CorrespondenceRecord {
    pub fn new(source_code: impl Into<String>, target_code: impl Into<String>) -> Self {
        Self {
            source_code: source_code.into(),
            target_code: target_code.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_partial(mut self, source: bool, target: bool) -> Self {
        self.source_partial = Some(source);
        self.target_partial = Some(target);
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
