//! Per-family rules: levels, depth and parent strategies.
//!
//! A [`FamilyRule`] is plain data. Everything that differs between
//! classification families is expressed here so that the builders stay
//! generic:
//!
//! - how a code maps to a level depth ([`DepthRule`])
//! - how the parent code is derived ([`ParentRule`])
//! - which level list applies to a given version ([`HistoricalRule`])

use stamina_model::{FamilyCode, VersionLabel};

/// Separator characters ignored when measuring a code.
pub const SEPARATORS: [char; 2] = ['.', '/'];

/// Qualifier word placed between family and version in identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionQualifier {
    /// "r", for families published as revisions.
    Revision,
    /// "v", for families published as versions.
    Version,
    /// No qualifier (national schemes).
    None,
}

impl VersionQualifier {
    pub fn token(&self) -> &'static str {
        match self {
            VersionQualifier::Revision => "r",
            VersionQualifier::Version => "v",
            VersionQualifier::None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDescriptor {
    pub name: String,
    pub notation_pattern: Option<String>,
    /// Short level notation ("AG2"), when the family publishes one.
    pub notation: Option<String>,
}

impl LevelDescriptor {
    pub fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            notation_pattern: Some(pattern.to_string()),
            notation: None,
        }
    }

    #[must_use]
    pub fn with_notation(mut self, notation: &str) -> Self {
        self.notation = Some(notation.to_string());
        self
    }
}

/// Code shape to level depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepthRule {
    /// Length of the code with separators removed.
    Stripped,
    /// Dashed codes and two-character codes are depth 1, otherwise length - 1.
    Composite,
    /// Raw character count to depth. Unlisted lengths are invalid.
    Shape(Vec<(usize, u8)>),
    /// Two characters per level; odd lengths are invalid.
    Paired,
}

/// A composite top-level code and the first-level prefixes it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeRange {
    pub code: String,
    pub prefixes: Vec<String>,
}

impl CompositeRange {
    pub fn new(code: &str, prefixes: &[&str]) -> Self {
        Self {
            code: code.to_string(),
            prefixes: prefixes.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRule {
    /// Drop the last character (and any separator left dangling).
    Truncate,
    /// Truncate, except that second-level codes whose prefix belongs to a
    /// composite range point to that range instead.
    Composite { ranges: Vec<CompositeRange> },
    /// Two-digit division codes look up their section in a named table;
    /// deeper codes truncate.
    SectionLookup { table: String },
    /// Parent given by the input record; a non-numeric parent means none.
    Explicit,
}

/// Selects the historical variant of a family for some versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelector {
    /// Versions whose leading number equals the value ("1", "1.1").
    Major(u32),
    /// Year-labelled versions up to and including the value ("2002").
    YearUpTo(u32),
}

impl VersionSelector {
    pub fn matches(&self, version: &VersionLabel) -> bool {
        let Some(number) = version.leading_number() else {
            return false;
        };
        match self {
            VersionSelector::Major(major) => number == *major,
            VersionSelector::YearUpTo(year) => {
                version.as_str().len() >= 4 && number >= 1000 && number <= *year
            }
        }
    }
}

/// Older editions that insert an extra letter level (subsections).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalRule {
    pub selector: VersionSelector,
    pub levels: Vec<LevelDescriptor>,
    pub parent: ParentRule,
    /// Added to the depth of codes starting with a digit.
    pub digit_offset: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyRule {
    pub family: FamilyCode,
    pub qualifier: VersionQualifier,
    pub levels: Vec<LevelDescriptor>,
    pub depth: DepthRule,
    pub parent: ParentRule,
    /// Long name template, `%s` standing for the version.
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub historical: Option<HistoricalRule>,
    /// Remove a leading section letter from longer codes before use.
    pub strip_section_prefix: bool,
}

impl FamilyRule {
    /// The rule as it applies to one version.
    pub fn resolve(&self, version: &VersionLabel) -> VersionRule<'_> {
        match &self.historical {
            Some(historical) if historical.selector.matches(version) => VersionRule {
                family: self,
                levels: &historical.levels,
                parent: &historical.parent,
                digit_offset: historical.digit_offset,
            },
            _ => VersionRule {
                family: self,
                levels: &self.levels,
                parent: &self.parent,
                digit_offset: 0,
            },
        }
    }
}

/// A [`FamilyRule`] narrowed to one version.
#[derive(Debug, Clone, Copy)]
pub struct VersionRule<'a> {
    pub family: &'a FamilyRule,
    pub levels: &'a [LevelDescriptor],
    pub parent: &'a ParentRule,
    pub digit_offset: u8,
}

impl VersionRule<'_> {
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Level descriptor at `depth` (1-based).
    pub fn level(&self, depth: u8) -> Option<&LevelDescriptor> {
        usize::from(depth)
            .checked_sub(1)
            .and_then(|index| self.levels.get(index))
    }
}

pub fn stripped_len(code: &str) -> usize {
    code.chars().filter(|c| !SEPARATORS.contains(c)).count()
}

/// Drop the last character and any trailing separators.
///
/// Returns `None` for codes of one significant character or less.
pub fn truncate(code: &str) -> Option<String> {
    if stripped_len(code) <= 1 {
        return None;
    }
    let mut chars: Vec<char> = code.chars().collect();
    chars.pop();
    while chars.last().is_some_and(|c| SEPARATORS.contains(c)) {
        chars.pop();
    }
    if chars.is_empty() {
        return None;
    }
    Some(chars.into_iter().collect())
}

pub fn starts_with_digit(code: &str) -> bool {
    code.chars().next().is_some_and(|c| c.is_ascii_digit())
}
