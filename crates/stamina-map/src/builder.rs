//! Correspondence construction.

use std::collections::BTreeSet;
use std::ops::Bound;

use stamina_model::{
    Association, ClassificationVersion, Correspondence, CorrespondenceRecord, Identifier, Side,
};
use stamina_standards::NamingResolver;
use tracing::{debug, info};

use crate::error::MapError;
use crate::rules::{CorrespondenceRule, Orientation};

/// Result of one correspondence build.
#[derive(Debug, Clone)]
pub struct CorrespondenceOutcome {
    pub correspondence: Correspondence,
    /// Records dropped as invalid or filtered out.
    pub skipped: usize,
    /// Records dropped because a finer record refines them.
    pub pruned: usize,
}

/// A record after orientation, padding and derivation.
#[derive(Debug, Clone)]
struct Prepared {
    source: String,
    target: String,
    partial: (bool, bool),
    comment: Option<String>,
}

impl Prepared {
    fn code(&self, side: Side) -> &str {
        match side {
            Side::Source => &self.source,
            Side::Target => &self.target,
        }
    }

    fn code_mut(&mut self, side: Side) -> &mut String {
        match side {
            Side::Source => &mut self.source,
            Side::Target => &mut self.target,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CorrespondenceBuilder<'a> {
    naming: NamingResolver<'a>,
}

impl<'a> CorrespondenceBuilder<'a> {
    pub fn new(naming: NamingResolver<'a>) -> Self {
        Self { naming }
    }

    /// Builds the correspondence described by `rule` from `records`.
    ///
    /// Invalid records are skipped and counted; associations keep the input
    /// order of the records that survive.
    pub fn build<I>(
        &self,
        rule: &CorrespondenceRule,
        records: I,
    ) -> Result<CorrespondenceOutcome, MapError>
    where
        I: IntoIterator<Item = CorrespondenceRecord>,
    {
        for version in [&rule.source, &rule.target] {
            if self
                .naming
                .classifier()
                .registry()
                .rule(&version.family)
                .is_none()
            {
                return Err(MapError::UnknownFamily {
                    version: version.clone(),
                });
            }
        }
        if let Some(empty) = rule.expansions.iter().find(|e| e.members.is_empty()) {
            return Err(MapError::EmptyExpansion {
                code: empty.code.clone(),
            });
        }

        let mut skipped = 0usize;
        let mut prepared = Vec::new();
        for record in records {
            match self.prepare(rule, record) {
                Some(record) => prepared.push(record),
                None => skipped += 1,
            }
        }

        let mut pruned = 0usize;
        if rule.prune_refined {
            let before = prepared.len();
            prepared = prune_refined(prepared, rule.detailed);
            pruned = before - prepared.len();
        }

        let mut associations = Vec::with_capacity(prepared.len());
        for record in prepared {
            match self.associate(rule, record) {
                Some(association) => associations.push(association),
                None => skipped += 1,
            }
        }

        let correspondence = Correspondence {
            id: self.naming.correspondence_id(&rule.source, &rule.target),
            source: rule.source.clone(),
            target: rule.target.clone(),
            compares: [
                self.naming.scheme_id(&rule.source),
                self.naming.scheme_id(&rule.target),
            ],
            notation: self
                .naming
                .correspondence_short_name(&rule.source, &rule.target),
            definitions: self
                .naming
                .correspondence_definitions(&rule.source, &rule.target),
            associations,
        };
        info!(
            source = %rule.source,
            target = %rule.target,
            associations = correspondence.len(),
            skipped,
            pruned,
            "correspondence built"
        );
        Ok(CorrespondenceOutcome {
            correspondence,
            skipped,
            pruned,
        })
    }

    fn prepare(&self, rule: &CorrespondenceRule, record: CorrespondenceRecord) -> Option<Prepared> {
        let (first, second) = (record.source_code.trim(), record.target_code.trim());
        let (source, target) = match rule.orientation {
            Orientation::AsRead => (first, second),
            Orientation::Swapped => (second, first),
        };
        let mut prepared = Prepared {
            source: self.naming.classifier().normalize_code(&rule.source, source),
            target: self.naming.classifier().normalize_code(&rule.target, target),
            partial: match rule.orientation {
                Orientation::AsRead => (
                    record.source_partial.unwrap_or(false),
                    record.target_partial.unwrap_or(false),
                ),
                Orientation::Swapped => (
                    record.target_partial.unwrap_or(false),
                    record.source_partial.unwrap_or(false),
                ),
            },
            comment: record.comment.filter(|c| !c.trim().is_empty()),
        };

        if let Some((side, width)) = rule.zero_pad {
            let code = prepared.code_mut(side);
            if !code.is_empty() && code.len() < width {
                *code = format!("{code:0>width$}");
            }
        }
        if let Some(derive) = rule.derive {
            let derived = derive.apply(prepared.code(derive.side.other()));
            *prepared.code_mut(derive.side) = derived;
        }

        if prepared.source.is_empty() || prepared.target.is_empty() {
            debug!(source = %prepared.source, target = %prepared.target, "empty code skipped");
            return None;
        }
        for side in &rule.numeric {
            let code = prepared.code(*side);
            if !code.starts_with(|c: char| c.is_ascii_digit()) {
                debug!(code = %code, "non-numeric code skipped");
                return None;
            }
        }
        if let Some((side, len)) = rule.keep_length
            && prepared.code(side).chars().count() != len
        {
            return None;
        }
        if let Some((side, len)) = rule.min_length
            && prepared.code(side).chars().count() < len
        {
            return None;
        }
        Some(prepared)
    }

    fn associate(&self, rule: &CorrespondenceRule, record: Prepared) -> Option<Association> {
        let source_refs = match rule.expansion(&record.source) {
            Some(expansion) => expansion
                .members
                .iter()
                .map(|member| self.item_ref(&rule.source, member))
                .collect::<Option<Vec<_>>>()?,
            None => vec![self.item_ref(&rule.source, &record.source)?],
        };
        let target_ref = self.item_ref(&rule.target, &record.target)?;
        Some(Association {
            id: self.naming.association_id(
                &rule.source,
                &rule.target,
                &record.source,
                &record.target,
            ),
            match_kind: rule.infer(&record.source, &record.target, record.partial),
            label: self.naming.association_label(
                &rule.source,
                &rule.target,
                &record.source,
                &record.target,
                record.partial,
            ),
            source_refs,
            target_ref,
            source_code: record.source,
            target_code: record.target,
            comment: record.comment,
        })
    }

    fn item_ref(&self, version: &ClassificationVersion, code: &str) -> Option<Identifier> {
        let id = self.naming.item_id(version, code);
        if id.is_none() {
            debug!(version = %version, code = %code, "code fits no level, record skipped");
        }
        id
    }
}

/// Keeps only records whose detailed code no other record refines.
fn prune_refined(records: Vec<Prepared>, detailed: Side) -> Vec<Prepared> {
    let codes: BTreeSet<String> = records
        .iter()
        .map(|r| r.code(detailed).to_string())
        .collect();
    records
        .into_iter()
        .filter(|record| {
            let code = record.code(detailed);
            !codes
                .range::<str, _>((Bound::Excluded(code), Bound::Unbounded))
                .next()
                .is_some_and(|next| next.starts_with(code))
        })
        .collect()
}
