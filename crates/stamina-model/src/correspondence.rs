use serde::{Deserialize, Serialize};

use crate::{ClassificationVersion, Identifier, Label, MatchKind};

/// A single source-to-target link.
///
/// Items are referenced by identifier only; neither side needs to exist in
/// a scheme built during the same run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub id: Identifier,
    pub source_code: String,
    pub target_code: String,
    /// Usually one reference; several when a source group code stands for
    /// a list of classes.
    pub source_refs: Vec<Identifier>,
    pub target_ref: Identifier,
    pub match_kind: MatchKind,
    pub label: String,
    pub comment: Option<String>,
}

/// A correspondence table between two classification versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correspondence {
    pub id: Identifier,
    pub source: ClassificationVersion,
    pub target: ClassificationVersion,
    pub compares: [Identifier; 2],
    pub notation: String,
    pub definitions: Vec<Label>,
    /// Input order is kept.
    pub associations: Vec<Association>,
}

impl Correspondence {
    pub fn association(&self, source_code: &str, target_code: &str) -> Option<&Association> {
        self.associations
            .iter()
            .find(|a| a.source_code == source_code && a.target_code == target_code)
    }

    pub fn len(&self) -> usize {
        self.associations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }
}
