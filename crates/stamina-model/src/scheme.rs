//! Concept scheme model: levels, items and the item arena.
//!
//! A [`Scheme`] is built once from a stream of records and then handed to a
//! sink; nothing here is updated after assembly. Items live in an
//! [`ItemArena`] keyed by identifier so that a parent can be referenced
//! before its own record is seen:
//!
//! - a reference to an unknown parent inserts a *stub* (identifier and code only)
//! - a later record for the same code *enriches* the stub in place
//!
//! Stubs that never receive a record stay in the arena as bare references.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{ClassificationVersion, Identifier, NoteKind};

/// A language-tagged text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub language: String,
}

impl Label {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }
}

/// Adds `label` unless a label in the same language is already present.
///
/// Returns `true` when the label was added.
pub fn add_label_if_absent(labels: &mut Vec<Label>, label: Label) -> bool {
    if labels.iter().any(|l| l.language == label.language) {
        return false;
    }
    labels.push(label);
    true
}

/// A note attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub kind: NoteKind,
    pub text: String,
    pub language: String,
}

/// A horizontal slice of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: Identifier,
    /// 1 is the most aggregated level.
    pub depth: u8,
    pub name: String,
    pub labels: Vec<Label>,
    pub notation_pattern: Option<String>,
    pub notation: Option<String>,
}

/// A classification item, possibly still a forward-reference stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Identifier,
    pub code: String,
    pub labels: Vec<Label>,
    pub notes: Vec<Note>,
    /// Depth of the level the item belongs to; `None` while a stub.
    pub depth: Option<u8>,
    pub parent: Option<Identifier>,
    pub children: BTreeSet<Identifier>,
}

impl Item {
    pub fn stub(id: Identifier, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            depth: None,
            parent: None,
            children: BTreeSet::new(),
        }
    }

    /// True until a record for this code has been applied.
    pub fn is_stub(&self) -> bool {
        self.depth.is_none()
    }

    pub fn label(&self, language: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.language == language)
            .map(|l| l.text.as_str())
    }
}

/// Items keyed by identifier, with a code index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemArena {
    items: BTreeMap<Identifier, Item>,
    by_code: BTreeMap<String, Identifier>,
}

impl ItemArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `id`, inserting a bare stub for `code` when absent.
    pub fn get_or_insert_stub(&mut self, id: &Identifier, code: &str) -> &mut Item {
        self.by_code
            .entry(code.to_string())
            .or_insert_with(|| id.clone());
        self.items
            .entry(id.clone())
            .or_insert_with(|| Item::stub(id.clone(), code))
    }

    pub fn get(&self, id: &Identifier) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &Identifier) -> Option<&mut Item> {
        self.items.get_mut(id)
    }

    pub fn by_code(&self, code: &str) -> Option<&Item> {
        self.by_code.get(code).and_then(|id| self.items.get(id))
    }

    pub fn id_for_code(&self, code: &str) -> Option<&Identifier> {
        self.by_code.get(code)
    }

    /// Items in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items referenced as parents but never populated from a record.
    pub fn stubs(&self) -> impl Iterator<Item = &Item> {
        self.items.values().filter(|item| item.is_stub())
    }
}

/// One classification version materialized as a concept scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: Identifier,
    pub version: ClassificationVersion,
    pub notation: String,
    pub labels: Vec<Label>,
    pub levels: Vec<Level>,
    pub items: ItemArena,
    pub top_concepts: BTreeSet<Identifier>,
    /// Level depth to member item identifiers.
    pub members: BTreeMap<u8, BTreeSet<Identifier>>,
}

impl Scheme {
    pub fn new(
        id: Identifier,
        version: ClassificationVersion,
        notation: impl Into<String>,
        labels: Vec<Label>,
        levels: Vec<Level>,
    ) -> Self {
        let members = levels
            .iter()
            .map(|level| (level.depth, BTreeSet::new()))
            .collect();
        Self {
            id,
            version,
            notation: notation.into(),
            labels,
            levels,
            items: ItemArena::new(),
            top_concepts: BTreeSet::new(),
            members,
        }
    }

    pub fn level(&self, depth: u8) -> Option<&Level> {
        self.levels.iter().find(|level| level.depth == depth)
    }

    pub fn item(&self, code: &str) -> Option<&Item> {
        self.items.by_code(code)
    }

    pub fn parent_of(&self, code: &str) -> Option<&Item> {
        let item = self.items.by_code(code)?;
        item.parent.as_ref().and_then(|id| self.items.get(id))
    }

    /// Ancestors of `code`, nearest first. Stops if a cycle is detected.
    pub fn ancestors(&self, code: &str) -> Vec<&Item> {
        let mut out: Vec<&Item> = Vec::new();
        let mut seen = BTreeSet::new();
        let mut current = self.items.by_code(code);
        while let Some(item) = current {
            if !seen.insert(&item.id) {
                break;
            }
            match item.parent.as_ref().and_then(|id| self.items.get(id)) {
                Some(parent) => {
                    out.push(parent);
                    current = Some(parent);
                }
                None => break,
            }
        }
        out
    }

    pub fn is_top_concept(&self, code: &str) -> bool {
        self.items
            .id_for_code(code)
            .is_some_and(|id| self.top_concepts.contains(id))
    }

    /// Links `child` under `parent` both ways. Both must already be in the arena.
    pub fn link(&mut self, parent: &Identifier, child: &Identifier) {
        if let Some(item) = self.items.get_mut(child) {
            item.parent = Some(parent.clone());
        }
        if let Some(item) = self.items.get_mut(parent) {
            item.children.insert(child.clone());
        }
    }

    pub fn mark_top_concept(&mut self, id: &Identifier) {
        self.top_concepts.insert(id.clone());
    }

    pub fn add_member(&mut self, depth: u8, id: &Identifier) {
        self.members.entry(depth).or_default().insert(id.clone());
    }

    /// Populated (non-stub) item count.
    pub fn populated_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_stub()).count()
    }
}
