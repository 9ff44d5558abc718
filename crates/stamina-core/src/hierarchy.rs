//! Scheme construction from item records.
//!
//! Levels are created before any record is read. Each record then becomes
//! an item at the level of its code, linked to a parent derived by the
//! family rule. Parents need not precede children: a parent code that has
//! no item yet is inserted as a stub and enriched when its record arrives.

use stamina_model::{
    ClassificationVersion, Identifier, ItemRecord, Label, LabelRecord, Level, Note, Scheme,
    add_label_if_absent,
};
use stamina_standards::NamingResolver;
use tracing::{debug, warn};

use crate::error::{CoreError, Result};

/// A built scheme and the number of records that could not be used.
#[derive(Debug, Clone)]
pub struct HierarchyOutcome {
    pub scheme: Scheme,
    pub skipped: usize,
}

/// Counts from an additional-label pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelMerge {
    pub added: usize,
    /// Item already had a label in that language.
    pub kept: usize,
    /// No item with that code.
    pub unknown: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct HierarchyBuilder<'a> {
    naming: NamingResolver<'a>,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(naming: NamingResolver<'a>) -> Self {
        Self { naming }
    }

    /// Empty scheme with its header and every level of the version.
    pub fn scheme_header(&self, version: &ClassificationVersion) -> Result<Scheme> {
        let levels = self.naming.classifier().levels(version);
        if levels.is_empty() {
            return Err(CoreError::UnknownFamily {
                version: version.clone(),
            });
        }
        let levels = levels
            .iter()
            .zip(1u8..)
            .filter_map(|(descriptor, depth)| {
                Some(Level {
                    id: self.naming.level_id(version, depth)?,
                    depth,
                    name: descriptor.name.clone(),
                    labels: self
                        .naming
                        .level_label(version, depth)
                        .map(|text| vec![Label::new(text, "en")])
                        .unwrap_or_default(),
                    notation_pattern: descriptor.notation_pattern.clone(),
                    notation: descriptor.notation.clone(),
                })
            })
            .collect();
        let title = self
            .naming
            .long_name(version)
            .unwrap_or_else(|| self.naming.display_name(version));
        Ok(Scheme::new(
            self.naming.scheme_id(version),
            version.clone(),
            self.naming.display_name(version),
            vec![Label::new(title, "en")],
            levels,
        ))
    }

    /// Builds the scheme of `version` from `records`, in input order.
    pub fn build<I>(&self, version: &ClassificationVersion, records: I) -> Result<HierarchyOutcome>
    where
        I: IntoIterator<Item = ItemRecord>,
    {
        let mut scheme = self.scheme_header(version)?;
        let mut skipped = 0usize;
        for record in records {
            if !self.apply(&mut scheme, &record) {
                skipped += 1;
            }
        }
        Ok(HierarchyOutcome { scheme, skipped })
    }

    /// Adds one record to `scheme`. Returns `false` when the record was
    /// skipped.
    pub fn apply(&self, scheme: &mut Scheme, record: &ItemRecord) -> bool {
        let version = scheme.version.clone();
        let classifier = self.naming.classifier();
        let code = classifier.normalize_code(&version, &record.code);
        if code.is_empty() {
            warn!(version = %version, label = %record.label, "record without code skipped");
            return false;
        }
        let Some(level) = classifier.level_of(&version, &code) else {
            warn!(version = %version, code = %code, "code fits no level, record skipped");
            return false;
        };
        let Some(depth) = classifier.level_depth(&version, &code) else {
            return false;
        };
        let id = self.naming.item_id_at(&version, &level.name, &code);

        let item = scheme.items.get_or_insert_stub(&id, &code);
        item.depth = Some(depth);
        let label = record.label.trim();
        if !label.is_empty() {
            add_label_if_absent(&mut item.labels, Label::new(label, &record.language));
        }
        for (kind, text) in &record.notes {
            let text = text.trim();
            let present = item
                .notes
                .iter()
                .any(|n| n.kind == *kind && n.language == record.language);
            if !text.is_empty() && !present {
                item.notes.push(Note {
                    kind: *kind,
                    text: text.to_string(),
                    language: record.language.clone(),
                });
            }
        }

        match self.parent_id(&version, &code, depth, record.parent.as_deref()) {
            Some((parent_id, parent_code)) => {
                scheme.items.get_or_insert_stub(&parent_id, &parent_code);
                scheme.link(&parent_id, &id);
            }
            None => scheme.mark_top_concept(&id),
        }
        scheme.add_member(depth, &id);
        true
    }

    /// Parent identifier and code, if the item has a usable parent.
    ///
    /// A parent must classify at a shallower level than the child.
    fn parent_id(
        &self,
        version: &ClassificationVersion,
        code: &str,
        depth: u8,
        explicit: Option<&str>,
    ) -> Option<(Identifier, String)> {
        let classifier = self.naming.classifier();
        let parent = classifier.derive_parent(version, code, explicit)?;
        let parent = classifier.normalize_code(version, &parent);
        let parent_level = classifier.level_of(version, &parent);
        let parent_depth = classifier.level_depth(version, &parent);
        match (parent_level, parent_depth) {
            (Some(level), Some(parent_depth)) if parent_depth < depth => {
                Some((self.naming.item_id_at(version, &level.name, &parent), parent))
            }
            _ => {
                debug!(
                    version = %version,
                    code = %code,
                    parent = %parent,
                    "parent fits no shallower level, item kept as top concept"
                );
                None
            }
        }
    }

    /// Adds extra-language labels to existing items.
    ///
    /// An item keeps any label it already has in that language.
    pub fn merge_labels<I>(&self, scheme: &mut Scheme, records: I) -> LabelMerge
    where
        I: IntoIterator<Item = LabelRecord>,
    {
        let version = scheme.version.clone();
        let mut merge = LabelMerge::default();
        for record in records {
            let code = self
                .naming
                .classifier()
                .normalize_code(&version, &record.code);
            let Some(id) = scheme.items.id_for_code(&code).cloned() else {
                debug!(version = %version, code = %code, "label for unknown code");
                merge.unknown += 1;
                continue;
            };
            let Some(item) = scheme.items.get_mut(&id).filter(|item| !item.is_stub()) else {
                merge.unknown += 1;
                continue;
            };
            if add_label_if_absent(
                &mut item.labels,
                Label::new(record.label.trim(), record.language),
            ) {
                merge.added += 1;
            } else {
                merge.kept += 1;
            }
        }
        if merge.unknown > 0 {
            warn!(
                version = %version,
                unknown = merge.unknown,
                "labels for unknown codes ignored"
            );
        }
        merge
    }
}
