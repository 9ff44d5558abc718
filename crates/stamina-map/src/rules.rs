//! Per-table correspondence rules.
//!
//! A rule says how to read a correspondence table: which side is the more
//! detailed one, how a missing code is derived from the other side, which
//! records to keep, and how the match kind is inferred.

use serde::{Deserialize, Serialize};
use stamina_model::{ClassificationVersion, MatchKind, Side};
use stamina_standards::RefinementPolicy;

use crate::error::MapError;

/// Names accepted by [`CorrespondenceRule::preset`].
pub const PRESETS: &[&str] = &[
    "nace-ateco",
    "nace-naf",
    "cpa-cpf",
    "nace-sic",
    "nace-sbi",
    "nace-skd",
    "isic-nace",
    "isic-naics",
    "nace-cpa",
    "cross-version",
];

/// How the match kind of an association is inferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchRule {
    /// Exact when the detailed code ends with the suffix (e.g. `.00`).
    Suffix(String),
    /// Exact when the detailed code ends with the letter (e.g. `Z`).
    TrailingLetter(char),
    /// Exact when the detailed code has exactly this many characters.
    DetailLength(usize),
    /// Exact unless that side's partial flag is set, then close.
    PartialFlag(Side),
    /// Always close.
    Close,
    /// National refinements: narrower unless the policy allows same-code exact.
    Refinement(RefinementPolicy),
    /// No inference.
    Unspecified,
}

/// Which file column holds the source code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// First code is the source.
    #[default]
    AsRead,
    /// First code is the target.
    Swapped,
}

/// Derives one side's code from the other side's code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDerivation {
    /// The side whose code is derived.
    pub side: Side,
    /// Prefix length taken from the other code; `None` copies it whole.
    pub prefix_len: Option<usize>,
}

impl CodeDerivation {
    pub fn prefix(side: Side, len: usize) -> Self {
        Self {
            side,
            prefix_len: Some(len),
        }
    }

    pub fn identity(side: Side) -> Self {
        Self {
            side,
            prefix_len: None,
        }
    }

    /// Codes no longer than the prefix are kept unchanged.
    pub fn apply(&self, from: &str) -> String {
        match self.prefix_len {
            Some(len) => from.chars().take(len).collect(),
            None => from.to_string(),
        }
    }
}

/// A source group code standing for a list of source classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkExpansion {
    pub code: String,
    pub members: Vec<String>,
}

impl LinkExpansion {
    pub fn new<I, S>(code: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code: code.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// How to turn a correspondence table into associations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrespondenceRule {
    pub source: ClassificationVersion,
    pub target: ClassificationVersion,
    pub match_rule: MatchRule,
    /// The side carrying the finer codes.
    pub detailed: Side,
    pub orientation: Orientation,
    pub derive: Option<CodeDerivation>,
    /// Keep only records whose code on that side has this length.
    pub keep_length: Option<(Side, usize)>,
    /// Drop records whose code on that side is shorter.
    pub min_length: Option<(Side, usize)>,
    /// Left-pad codes on that side with zeros up to the width.
    pub zero_pad: Option<(Side, usize)>,
    /// Sides whose codes must start with a digit.
    pub numeric: Vec<Side>,
    pub expansions: Vec<LinkExpansion>,
    /// Drop a record whose detailed code is refined by another record.
    pub prune_refined: bool,
}

impl CorrespondenceRule {
    /// A rule that keeps every record and infers nothing.
    pub fn new(source: ClassificationVersion, target: ClassificationVersion) -> Self {
        Self {
            source,
            target,
            match_rule: MatchRule::Unspecified,
            detailed: Side::Target,
            orientation: Orientation::AsRead,
            derive: None,
            keep_length: None,
            min_length: None,
            zero_pad: None,
            numeric: Vec::new(),
            expansions: Vec::new(),
            prune_refined: false,
        }
    }

    /// One of the named [`PRESETS`].
    pub fn preset(
        name: &str,
        source: ClassificationVersion,
        target: ClassificationVersion,
    ) -> Result<Self, MapError> {
        let rule = Self::new(source, target);
        let rule = match name {
            "nace-ateco" => rule
                .with_match_rule(MatchRule::Suffix(".00".to_string()))
                .with_derive(CodeDerivation::prefix(Side::Source, 5))
                .with_min_length(Side::Target, 8),
            "nace-naf" => rule
                .with_match_rule(MatchRule::TrailingLetter('Z'))
                .with_derive(CodeDerivation::prefix(Side::Source, 5)),
            "cpa-cpf" => rule
                .with_match_rule(MatchRule::Close)
                .with_derive(CodeDerivation::identity(Side::Source)),
            "nace-sic" => rule
                .with_match_rule(MatchRule::DetailLength(5))
                .with_derive(CodeDerivation::prefix(Side::Source, 5))
                .with_prune_refined(true),
            "nace-sbi" | "nace-skd" => rule
                .with_match_rule(MatchRule::Refinement(RefinementPolicy::default()))
                .with_derive(CodeDerivation::identity(Side::Source)),
            "isic-nace" => rule
                .with_match_rule(MatchRule::PartialFlag(Side::Source))
                .with_keep_length(Side::Source, 4),
            "isic-naics" => rule
                .with_zero_pad(Side::Source, 4)
                .with_expansions(naics_group_links()),
            "nace-cpa" => rule
                .with_derive(CodeDerivation::prefix(Side::Source, 5))
                .with_keep_length(Side::Target, 8),
            "cross-version" => rule.with_numeric(Side::Source).with_numeric(Side::Target),
            other => return Err(MapError::UnknownPreset(other.to_string())),
        };
        Ok(rule)
    }

    #[must_use]
    pub fn with_match_rule(mut self, match_rule: MatchRule) -> Self {
        self.match_rule = match_rule;
        self
    }

    #[must_use]
    pub fn with_detailed(mut self, side: Side) -> Self {
        self.detailed = side;
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_derive(mut self, derive: CodeDerivation) -> Self {
        self.derive = Some(derive);
        self
    }

    #[must_use]
    pub fn with_keep_length(mut self, side: Side, len: usize) -> Self {
        self.keep_length = Some((side, len));
        self
    }

    #[must_use]
    pub fn with_min_length(mut self, side: Side, len: usize) -> Self {
        self.min_length = Some((side, len));
        self
    }

    #[must_use]
    pub fn with_zero_pad(mut self, side: Side, width: usize) -> Self {
        self.zero_pad = Some((side, width));
        self
    }

    #[must_use]
    pub fn with_numeric(mut self, side: Side) -> Self {
        if !self.numeric.contains(&side) {
            self.numeric.push(side);
        }
        self
    }

    #[must_use]
    pub fn with_expansions(mut self, expansions: Vec<LinkExpansion>) -> Self {
        self.expansions = expansions;
        self
    }

    #[must_use]
    pub fn with_prune_refined(mut self, prune: bool) -> Self {
        self.prune_refined = prune;
        self
    }

    /// `all_levels = true` keeps records at every level of the detailed
    /// classification instead of only its most detailed one.
    #[must_use]
    pub fn with_all_levels(mut self, all_levels: bool) -> Self {
        if all_levels {
            self.keep_length = None;
        }
        self
    }

    /// Replaces the policy of a [`MatchRule::Refinement`] rule.
    #[must_use]
    pub fn with_refinement_policy(mut self, policy: RefinementPolicy) -> Self {
        if let MatchRule::Refinement(current) = &mut self.match_rule {
            *current = policy;
        }
        self
    }

    pub fn expansion(&self, code: &str) -> Option<&LinkExpansion> {
        self.expansions.iter().find(|e| e.code == code)
    }

    /// Match kind of one association.
    pub fn infer(
        &self,
        source_code: &str,
        target_code: &str,
        partial: (bool, bool),
    ) -> MatchKind {
        let detailed = match self.detailed {
            Side::Source => source_code,
            Side::Target => target_code,
        };
        let narrower = match self.detailed {
            Side::Source => MatchKind::NarrowFromSourceToTarget,
            Side::Target => MatchKind::BroadFromSourceToTarget,
        };
        let exact_if = |exact: bool| if exact { MatchKind::Exact } else { narrower };
        match &self.match_rule {
            MatchRule::Suffix(suffix) => exact_if(detailed.ends_with(suffix.as_str())),
            MatchRule::TrailingLetter(letter) => exact_if(detailed.ends_with(*letter)),
            MatchRule::DetailLength(len) => exact_if(detailed.chars().count() == *len),
            MatchRule::PartialFlag(side) => {
                let flagged = match side {
                    Side::Source => partial.0,
                    Side::Target => partial.1,
                };
                if flagged {
                    MatchKind::Close
                } else {
                    MatchKind::Exact
                }
            }
            MatchRule::Close => MatchKind::Close,
            MatchRule::Refinement(policy) => {
                exact_if(*policy == RefinementPolicy::SameCode && source_code == target_code)
            }
            MatchRule::Unspecified => MatchKind::Unspecified,
        }
    }
}

/// ISIC group codes that the ISIC-NAICS table links as a whole.
fn naics_group_links() -> Vec<LinkExpansion> {
    vec![
        LinkExpansion::new(
            "012X",
            ["0121", "0122", "0123", "0124", "0125", "0126", "0127", "0128", "0129"],
        ),
        LinkExpansion::new(
            "014X",
            ["0141", "0142", "0143", "0144", "0145", "0146", "0149"],
        ),
        LinkExpansion::new(
            "331X",
            ["3311", "3312", "3313", "3314", "3315", "3319"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions() -> (ClassificationVersion, ClassificationVersion) {
        (
            ClassificationVersion::parse("NACE", "2").unwrap(),
            ClassificationVersion::parse("ATECO", "2007").unwrap(),
        )
    }

    #[test]
    fn every_preset_name_resolves() {
        let (source, target) = versions();
        for name in PRESETS {
            assert!(
                CorrespondenceRule::preset(name, source.clone(), target.clone()).is_ok(),
                "{name}"
            );
        }
        assert_eq!(
            CorrespondenceRule::preset("nace-xyz", source, target),
            Err(MapError::UnknownPreset("nace-xyz".to_string()))
        );
    }

    #[test]
    fn derivation_keeps_short_codes() {
        let derive = CodeDerivation::prefix(Side::Source, 5);
        assert_eq!(derive.apply("01.11.11"), "01.11");
        assert_eq!(derive.apply("01.1"), "01.1");
        assert_eq!(CodeDerivation::identity(Side::Source).apply("01.11"), "01.11");
    }

    #[test]
    fn refinement_policy_controls_exactness() {
        let (source, target) = versions();
        let rule = CorrespondenceRule::preset("nace-sbi", source, target).unwrap();
        assert_eq!(
            rule.infer("01.11", "01.11", (false, false)),
            MatchKind::BroadFromSourceToTarget
        );
        let rule = rule.with_refinement_policy(RefinementPolicy::SameCode);
        assert_eq!(rule.infer("01.11", "01.11", (false, false)), MatchKind::Exact);
        assert_eq!(
            rule.infer("01.11", "01.11.1", (false, false)),
            MatchKind::BroadFromSourceToTarget
        );
    }

    #[test]
    fn all_levels_lifts_the_detail_filter() {
        let (source, target) = versions();
        let rule = CorrespondenceRule::preset("nace-cpa", source, target).unwrap();
        assert_eq!(rule.keep_length, Some((Side::Target, 8)));
        assert_eq!(rule.with_all_levels(true).keep_length, None);
    }
}
