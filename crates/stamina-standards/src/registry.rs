#![deny(unsafe_code)]

use std::collections::BTreeMap;

use stamina_model::{ClassificationVersion, FamilyCode};

use crate::builtin::{NACE_SECTIONS, builtin_families, nace_section_table};
use crate::error::StandardsError;
use crate::family::{FamilyRule, VersionRule};
use crate::sections::SectionTable;

/// Base of every generated identifier unless overridden.
pub const DEFAULT_BASE_URI: &str = "http://stamina-project.org/codes/";

/// Immutable configuration shared by the resolvers and builders.
///
/// Built once (from [`FamilyRegistry::builtin`] plus overrides), then only
/// read. Builders borrow it, so several builds can share one registry.
#[derive(Debug, Clone)]
pub struct FamilyRegistry {
    base_uri: String,
    families: BTreeMap<FamilyCode, FamilyRule>,
    sections: BTreeMap<String, SectionTable>,
}

impl Default for FamilyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FamilyRegistry {
    /// An empty registry: no families, no tables.
    pub fn empty() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
            families: BTreeMap::new(),
            sections: BTreeMap::new(),
        }
    }

    /// All built-in families and the NACE Rev. 2 division table.
    pub fn builtin() -> Self {
        builtin_families()
            .into_iter()
            .fold(Self::empty(), Self::with_family)
            .with_section_table(NACE_SECTIONS, nace_section_table())
    }

    #[must_use]
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        let mut base_uri = base_uri.into();
        if !base_uri.ends_with('/') {
            base_uri.push('/');
        }
        self.base_uri = base_uri;
        self
    }

    /// Adds or replaces a family rule.
    #[must_use]
    pub fn with_family(mut self, rule: FamilyRule) -> Self {
        self.families.insert(rule.family.clone(), rule);
        self
    }

    /// Adds or replaces a named division table.
    #[must_use]
    pub fn with_section_table(mut self, name: impl Into<String>, table: SectionTable) -> Self {
        self.sections.insert(name.into(), table);
        self
    }

    /// Turns leading section-letter stripping on or off for one family.
    pub fn with_section_prefix_stripping(
        mut self,
        family: &FamilyCode,
        enabled: bool,
    ) -> Result<Self, StandardsError> {
        let rule = self
            .families
            .get_mut(family)
            .ok_or_else(|| StandardsError::UnknownFamily {
                family: family.to_string(),
            })?;
        rule.strip_section_prefix = enabled;
        Ok(self)
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn rule(&self, family: &FamilyCode) -> Option<&FamilyRule> {
        self.families.get(family)
    }

    /// The family rule narrowed to `version`.
    pub fn version_rule(&self, version: &ClassificationVersion) -> Option<VersionRule<'_>> {
        self.rule(&version.family)
            .map(|rule| rule.resolve(&version.version))
    }

    pub fn section_table(&self, name: &str) -> Option<&SectionTable> {
        self.sections.get(name)
    }

    pub fn families(&self) -> impl Iterator<Item = &FamilyRule> {
        self.families.values()
    }
}
