//! Identifier and display-name resolution.
//!
//! Identifiers are composed from a small set of primitives:
//!
//! | Resource | Identifier |
//! |---|---|
//! | scheme | `{base}{context}/{family}` |
//! | level | `{base}{context}/{plural level name}` |
//! | item | `{base}{context}/{level name}/{code}` |
//! | correspondence | `{base}{contextA}-{contextB}/correspondence` |
//! | association | `{base}{contextA}-{contextB}/association/{source}-{target}` |
//!
//! where `context` is the lower-case family, the version qualifier and the
//! version with dots removed (`isicr4`, `cpcv21`, `naics2012`).

use stamina_model::{ClassificationVersion, Identifier, Label};

use crate::classifier::LevelClassifier;
use crate::family::VersionQualifier;
use crate::registry::FamilyRegistry;

#[derive(Debug, Clone, Copy)]
pub struct NamingResolver<'a> {
    registry: &'a FamilyRegistry,
    classifier: LevelClassifier<'a>,
}

impl<'a> NamingResolver<'a> {
    pub fn new(registry: &'a FamilyRegistry) -> Self {
        Self {
            registry,
            classifier: LevelClassifier::new(registry),
        }
    }

    pub fn classifier(&self) -> &LevelClassifier<'a> {
        &self.classifier
    }

    /// Naming context of a version, e.g. `nacer2`.
    pub fn context(&self, version: &ClassificationVersion) -> String {
        let qualifier = self
            .registry
            .rule(&version.family)
            .map_or(VersionQualifier::None, |rule| rule.qualifier);
        format!(
            "{}{}{}",
            version.family.as_str().to_ascii_lowercase(),
            qualifier.token(),
            version.version.token()
        )
    }

    pub fn scheme_base(&self, version: &ClassificationVersion) -> String {
        format!("{}{}/", self.registry.base_uri(), self.context(version))
    }

    pub fn scheme_id(&self, version: &ClassificationVersion) -> Identifier {
        Identifier::new(format!(
            "{}{}",
            self.scheme_base(version),
            version.family.as_str().to_ascii_lowercase()
        ))
    }

    /// Identifier of the level at `depth`; `None` outside the level list.
    pub fn level_id(&self, version: &ClassificationVersion, depth: u8) -> Option<Identifier> {
        let level = self.level_name(version, depth)?;
        Some(Identifier::new(format!(
            "{}{}",
            self.scheme_base(version),
            pluralize(level)
        )))
    }

    /// Identifier of an item; `None` when the code fits no level.
    pub fn item_id(&self, version: &ClassificationVersion, code: &str) -> Option<Identifier> {
        let level = self.classifier.level_of(version, code)?;
        Some(self.item_id_at(version, &level.name, code))
    }

    /// Identifier of an item whose level name is already known.
    pub fn item_id_at(
        &self,
        version: &ClassificationVersion,
        level_name: &str,
        code: &str,
    ) -> Identifier {
        Identifier::new(format!("{}{level_name}/{code}", self.scheme_base(version)))
    }

    pub fn correspondence_context(
        &self,
        source: &ClassificationVersion,
        target: &ClassificationVersion,
    ) -> String {
        format!("{}-{}", self.context(source), self.context(target))
    }

    pub fn correspondence_id(
        &self,
        source: &ClassificationVersion,
        target: &ClassificationVersion,
    ) -> Identifier {
        Identifier::new(format!(
            "{}{}/correspondence",
            self.registry.base_uri(),
            self.correspondence_context(source, target)
        ))
    }

    pub fn association_id(
        &self,
        source: &ClassificationVersion,
        target: &ClassificationVersion,
        source_code: &str,
        target_code: &str,
    ) -> Identifier {
        Identifier::new(format!(
            "{}{}/association/{source_code}-{target_code}",
            self.registry.base_uri(),
            self.correspondence_context(source, target)
        ))
    }

    /// Long display name; `None` for families without one.
    pub fn long_name(&self, version: &ClassificationVersion) -> Option<String> {
        let template = self.registry.rule(&version.family)?.long_name.as_deref()?;
        Some(template.replace("%s", version.version.as_str()))
    }

    /// Short display name; `None` for families without one.
    pub fn short_name(&self, version: &ClassificationVersion) -> Option<String> {
        let template = self.registry.rule(&version.family)?.short_name.as_deref()?;
        Some(template.replace("%s", version.version.as_str()))
    }

    /// Short name, falling back to `FAMILY version`.
    pub fn display_name(&self, version: &ClassificationVersion) -> String {
        self.short_name(version)
            .unwrap_or_else(|| version.to_string())
    }

    pub fn level_name(&self, version: &ClassificationVersion, depth: u8) -> Option<&'a str> {
        let index = usize::from(depth).checked_sub(1)?;
        self.classifier
            .levels(version)
            .get(index)
            .map(|level| level.name.as_str())
    }

    /// `"<scheme name> - <Level> level"`.
    pub fn level_label(&self, version: &ClassificationVersion, depth: u8) -> Option<String> {
        let name = self.level_name(version, depth)?;
        let scheme = self
            .long_name(version)
            .unwrap_or_else(|| self.display_name(version));
        Some(format!("{scheme} - {} level", capitalize(name)))
    }

    pub fn correspondence_short_name(
        &self,
        source: &ClassificationVersion,
        target: &ClassificationVersion,
    ) -> String {
        format!(
            "{} - {}",
            self.display_name(source),
            self.display_name(target)
        )
    }

    /// English and French definitions of a correspondence table.
    pub fn correspondence_definitions(
        &self,
        source: &ClassificationVersion,
        target: &ClassificationVersion,
    ) -> Vec<Label> {
        let source = self.display_name(source);
        let target = self.display_name(target);
        vec![
            Label::new(
                format!("Correspondence table from {source} to {target}"),
                "en",
            ),
            Label::new(
                format!("Table de correspondance entre la {source} et la {target}"),
                "fr",
            ),
        ]
    }

    /// `"<short A> <code>[(p)] - <short B> <code>[(p)]"`.
    pub fn association_label(
        &self,
        source: &ClassificationVersion,
        target: &ClassificationVersion,
        source_code: &str,
        target_code: &str,
        partial: (bool, bool),
    ) -> String {
        let mark = |flag: bool| if flag { "(p)" } else { "" };
        format!(
            "{} {source_code}{} - {} {target_code}{}",
            self.display_name(source),
            mark(partial.0),
            self.display_name(target),
            mark(partial.1)
        )
    }
}

/// English plural of a level name: "class" -> "classes",
/// "category" -> "categories", "division" -> "divisions".
pub fn pluralize(name: &str) -> String {
    if name.ends_with("ss") {
        format!("{name}es")
    } else if let Some(stem) = name.strip_suffix('y') {
        format!("{stem}ies")
    } else {
        format!("{name}s")
    }
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
