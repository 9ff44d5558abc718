//! Graph construction calls and the in-memory graph.
//!
//! Builders never produce serialization syntax. A finished [`Scheme`] or
//! [`Correspondence`] is replayed into a [`GraphSink`], which owns the
//! concrete representation.

use serde::{Deserialize, Serialize};
use stamina_model::{Correspondence, Identifier, Label, MatchKind, Note, Scheme};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed for {id}: {message}")]
pub struct SinkError {
    pub operation: &'static str,
    pub id: String,
    pub message: String,
}

impl SinkError {
    pub fn new(operation: &'static str, id: &Identifier, message: impl Into<String>) -> Self {
        Self {
            operation,
            id: id.to_string(),
            message: message.into(),
        }
    }
}

pub type SinkResult = Result<(), SinkError>;

/// Receiver of graph-construction calls.
///
/// Each job's output is bracketed by [`begin`](GraphSink::begin) and either
/// [`commit`](GraphSink::commit) or [`rollback`](GraphSink::rollback). The
/// defaults suit sinks that cannot take writes back.
pub trait GraphSink {
    fn begin(&mut self) -> SinkResult {
        Ok(())
    }

    fn commit(&mut self) -> SinkResult {
        Ok(())
    }

    /// Discards everything written since the last `begin`.
    fn rollback(&mut self) {}

    fn create_scheme(&mut self, id: &Identifier, labels: &[Label], notation: &str) -> SinkResult;

    fn create_level(
        &mut self,
        id: &Identifier,
        depth: u8,
        labels: &[Label],
        notation_pattern: Option<&str>,
    ) -> SinkResult;

    fn create_item(
        &mut self,
        id: &Identifier,
        code: &str,
        labels: &[Label],
        notes: &[Note],
        level: &Identifier,
    ) -> SinkResult;

    fn link_broader_narrower(&mut self, parent: &Identifier, child: &Identifier) -> SinkResult;

    fn mark_top_concept(&mut self, item: &Identifier, scheme: &Identifier) -> SinkResult;

    fn create_correspondence(
        &mut self,
        id: &Identifier,
        compares: &[Identifier; 2],
        definitions: &[Label],
    ) -> SinkResult;

    fn create_association(
        &mut self,
        id: &Identifier,
        sources: &[Identifier],
        target: &Identifier,
        match_kind: MatchKind,
        label: &str,
        comment: Option<&str>,
    ) -> SinkResult;
}

/// Replays a scheme: header, levels by depth, populated items by
/// identifier, broader/narrower edges, then top concepts.
///
/// Stubs are only referenced, never created.
pub fn write_scheme(scheme: &Scheme, sink: &mut dyn GraphSink) -> SinkResult {
    sink.create_scheme(&scheme.id, &scheme.labels, &scheme.notation)?;

    let mut levels: Vec<_> = scheme.levels.iter().collect();
    levels.sort_by_key(|level| level.depth);
    for level in levels {
        sink.create_level(
            &level.id,
            level.depth,
            &level.labels,
            level.notation_pattern.as_deref(),
        )?;
    }

    for item in scheme.items.iter() {
        let Some(level) = item.depth.and_then(|depth| scheme.level(depth)) else {
            continue;
        };
        sink.create_item(&item.id, &item.code, &item.labels, &item.notes, &level.id)?;
    }
    for item in scheme.items.iter() {
        if let Some(parent) = &item.parent {
            sink.link_broader_narrower(parent, &item.id)?;
        }
    }
    for top in &scheme.top_concepts {
        sink.mark_top_concept(top, &scheme.id)?;
    }
    Ok(())
}

/// Replays a correspondence and its associations in input order.
pub fn write_correspondence(correspondence: &Correspondence, sink: &mut dyn GraphSink) -> SinkResult {
    sink.create_correspondence(
        &correspondence.id,
        &correspondence.compares,
        &correspondence.definitions,
    )?;
    for association in &correspondence.associations {
        sink.create_association(
            &association.id,
            &association.source_refs,
            &association.target_ref,
            association.match_kind,
            &association.label,
            association.comment.as_deref(),
        )?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeNode {
    pub id: Identifier,
    pub labels: Vec<Label>,
    pub notation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelNode {
    pub id: Identifier,
    pub depth: u8,
    pub labels: Vec<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notation_pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemNode {
    pub id: Identifier,
    pub code: String,
    pub labels: Vec<Label>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
    pub level: Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub broader: Identifier,
    pub narrower: Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopConcept {
    pub scheme: Identifier,
    pub item: Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrespondenceNode {
    pub id: Identifier,
    pub compares: [Identifier; 2],
    pub definitions: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationNode {
    pub id: Identifier,
    pub sources: Vec<Identifier>,
    pub target: Identifier,
    pub match_kind: MatchKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A [`GraphSink`] that keeps every call as plain data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryGraph {
    pub schemes: Vec<SchemeNode>,
    pub levels: Vec<LevelNode>,
    pub items: Vec<ItemNode>,
    pub edges: Vec<Edge>,
    pub top_concepts: Vec<TopConcept>,
    pub correspondences: Vec<CorrespondenceNode>,
    pub associations: Vec<AssociationNode>,
    /// Lengths at the last `begin`, while a job is open.
    #[serde(skip)]
    mark: Option<GraphMark>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GraphMark {
    schemes: usize,
    levels: usize,
    items: usize,
    edges: usize,
    top_concepts: usize,
    correspondences: usize,
    associations: usize,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(&self, id: &Identifier) -> Option<&ItemNode> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn narrower_of(&self, parent: &Identifier) -> Vec<&Identifier> {
        self.edges
            .iter()
            .filter(|edge| &edge.broader == parent)
            .map(|edge| &edge.narrower)
            .collect()
    }

    /// Nodes written so far; edges and top-concept markers are not counted.
    pub fn node_count(&self) -> usize {
        self.schemes.len()
            + self.levels.len()
            + self.items.len()
            + self.correspondences.len()
            + self.associations.len()
    }
}

impl GraphSink for MemoryGraph {
    fn begin(&mut self) -> SinkResult {
        self.mark = Some(GraphMark {
            schemes: self.schemes.len(),
            levels: self.levels.len(),
            items: self.items.len(),
            edges: self.edges.len(),
            top_concepts: self.top_concepts.len(),
            correspondences: self.correspondences.len(),
            associations: self.associations.len(),
        });
        Ok(())
    }

    fn commit(&mut self) -> SinkResult {
        self.mark = None;
        Ok(())
    }

    fn rollback(&mut self) {
        let Some(mark) = self.mark.take() else {
            return;
        };
        self.schemes.truncate(mark.schemes);
        self.levels.truncate(mark.levels);
        self.items.truncate(mark.items);
        self.edges.truncate(mark.edges);
        self.top_concepts.truncate(mark.top_concepts);
        self.correspondences.truncate(mark.correspondences);
        self.associations.truncate(mark.associations);
    }

    fn create_scheme(&mut self, id: &Identifier, labels: &[Label], notation: &str) -> SinkResult {
        self.schemes.push(SchemeNode {
            id: id.clone(),
            labels: labels.to_vec(),
            notation: notation.to_string(),
        });
        Ok(())
    }

    fn create_level(
        &mut self,
        id: &Identifier,
        depth: u8,
        labels: &[Label],
        notation_pattern: Option<&str>,
    ) -> SinkResult {
        self.levels.push(LevelNode {
            id: id.clone(),
            depth,
            labels: labels.to_vec(),
            notation_pattern: notation_pattern.map(str::to_string),
        });
        Ok(())
    }

    fn create_item(
        &mut self,
        id: &Identifier,
        code: &str,
        labels: &[Label],
        notes: &[Note],
        level: &Identifier,
    ) -> SinkResult {
        self.items.push(ItemNode {
            id: id.clone(),
            code: code.to_string(),
            labels: labels.to_vec(),
            notes: notes.to_vec(),
            level: level.clone(),
        });
        Ok(())
    }

    fn link_broader_narrower(&mut self, parent: &Identifier, child: &Identifier) -> SinkResult {
        self.edges.push(Edge {
            broader: parent.clone(),
            narrower: child.clone(),
        });
        Ok(())
    }

    fn mark_top_concept(&mut self, item: &Identifier, scheme: &Identifier) -> SinkResult {
        self.top_concepts.push(TopConcept {
            scheme: scheme.clone(),
            item: item.clone(),
        });
        Ok(())
    }

    fn create_correspondence(
        &mut self,
        id: &Identifier,
        compares: &[Identifier; 2],
        definitions: &[Label],
    ) -> SinkResult {
        self.correspondences.push(CorrespondenceNode {
            id: id.clone(),
            compares: compares.clone(),
            definitions: definitions.to_vec(),
        });
        Ok(())
    }

    fn create_association(
        &mut self,
        id: &Identifier,
        sources: &[Identifier],
        target: &Identifier,
        match_kind: MatchKind,
        label: &str,
        comment: Option<&str>,
    ) -> SinkResult {
        self.associations.push(AssociationNode {
            id: id.clone(),
            sources: sources.to_vec(),
            target: target.clone(),
            match_kind,
            label: label.to_string(),
            comment: comment.map(str::to_string),
        });
        Ok(())
    }
}
