//! Level depth and parent derivation.
//!
//! Everything here is pure: the only state consulted is the borrowed
//! [`FamilyRegistry`] and its division tables.

use stamina_model::ClassificationVersion;

use crate::family::{
    DepthRule, LevelDescriptor, ParentRule, VersionRule, starts_with_digit, stripped_len,
    truncate,
};
use crate::registry::FamilyRegistry;

#[derive(Debug, Clone, Copy)]
pub struct LevelClassifier<'a> {
    registry: &'a FamilyRegistry,
}

impl<'a> LevelClassifier<'a> {
    pub fn new(registry: &'a FamilyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a FamilyRegistry {
        self.registry
    }

    /// Ordered level descriptors of a version. Empty for unknown families.
    pub fn levels(&self, version: &ClassificationVersion) -> &'a [LevelDescriptor] {
        self.registry
            .version_rule(version)
            .map(|rule| rule.levels)
            .unwrap_or(&[])
    }

    pub fn level_count(&self, version: &ClassificationVersion) -> usize {
        self.levels(version).len()
    }

    /// Trims the code and applies the family's section-prefix policy.
    pub fn normalize_code(&self, version: &ClassificationVersion, code: &str) -> String {
        let code = code.trim();
        let strip = self
            .registry
            .rule(&version.family)
            .is_some_and(|rule| rule.strip_section_prefix);
        if strip && code.len() > 1 {
            let mut chars = code.chars();
            if chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.clone().next().is_some_and(|c| c.is_ascii_digit())
            {
                return chars.as_str().to_string();
            }
        }
        code.to_string()
    }

    /// Depth of `code` in `[1, level_count]`, or `None` when the code fits
    /// no level of the version (or the family is unknown).
    pub fn level_depth(&self, version: &ClassificationVersion, code: &str) -> Option<u8> {
        let rule = self.registry.version_rule(version)?;
        let depth = raw_depth(&rule, code)?;
        (1..=rule.level_count())
            .contains(&depth)
            .then(|| u8::try_from(depth).ok())
            .flatten()
    }

    /// Level descriptor the code belongs to.
    pub fn level_of(
        &self,
        version: &ClassificationVersion,
        code: &str,
    ) -> Option<&'a LevelDescriptor> {
        let depth = self.level_depth(version, code)?;
        self.levels(version).get(usize::from(depth) - 1)
    }

    /// Parent code of `code`, or `None` for top concepts and lookup misses.
    ///
    /// `explicit` is the parent given by the record, used only by families
    /// whose hierarchy is not encoded in the code.
    pub fn derive_parent(
        &self,
        version: &ClassificationVersion,
        code: &str,
        explicit: Option<&str>,
    ) -> Option<String> {
        let rule = self.registry.version_rule(version)?;
        match rule.parent {
            ParentRule::Truncate => truncate(code),
            ParentRule::Composite { ranges } => {
                let length = code.chars().count();
                if length <= 2 || code.contains('-') {
                    return None;
                }
                if length == 3
                    && let Some(range) = ranges
                        .iter()
                        .find(|range| range.prefixes.iter().any(|p| code.starts_with(p.as_str())))
                {
                    return Some(range.code.clone());
                }
                truncate(code)
            }
            ParentRule::SectionLookup { table } => {
                if is_division(code) {
                    return self
                        .registry
                        .section_table(table)
                        .and_then(|t| t.section_for(code))
                        .map(str::to_string);
                }
                truncate(code)
            }
            ParentRule::Explicit => explicit
                .map(str::trim)
                .filter(|parent| starts_with_digit(parent))
                .map(str::to_string),
        }
    }
}

fn is_division(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_digit())
}

fn raw_depth(rule: &VersionRule<'_>, code: &str) -> Option<usize> {
    if code.is_empty() {
        return None;
    }
    let length = code.chars().count();
    match &rule.family.depth {
        DepthRule::Stripped => {
            let offset = if starts_with_digit(code) {
                usize::from(rule.digit_offset)
            } else {
                0
            };
            Some(stripped_len(code) + offset)
        }
        DepthRule::Composite => {
            if code.contains('-') || length == 2 {
                Some(1)
            } else {
                length.checked_sub(1)
            }
        }
        DepthRule::Shape(table) => table
            .iter()
            .find(|(shape, _)| *shape == length)
            .map(|(_, depth)| usize::from(*depth)),
        DepthRule::Paired => (length % 2 == 0).then_some(length / 2),
    }
}
