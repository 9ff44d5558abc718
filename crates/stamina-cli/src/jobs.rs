//! Batch job files.
//!
//! A job file lists the schemes and correspondence tables of one run:
//!
//! ```toml
//! standards = "standards.toml"
//!
//! [[scheme]]
//! family = "ISIC"
//! version = "4"
//! items = "isic/ISIC4_en.csv"
//! columns = { code = "Code", label = "Description" }
//!
//! [[scheme.labels]]
//! path = "isic/ISIC4_fr.csv"
//! columns = { code = "Code", label = "Libelle", language = "fr" }
//!
//! [[correspondence]]
//! source = { family = "NACE", version = "2" }
//! target = { family = "ATECO", version = "2007" }
//! records = "ateco/NACE_ATECO.csv"
//! preset = "nace-ateco"
//! ```
//!
//! Relative paths resolve against the directory holding the job file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use stamina_core::{
    CorrespondenceJob, CsvCorrespondences, CsvItems, CsvLabels, Job, RecordSource, SchemeJob,
};
use stamina_ingest::{CorrespondenceColumns, ItemColumns, LabelColumns, TableFormat};
use stamina_map::{CorrespondenceRule, Orientation};
use stamina_model::{ClassificationVersion, LabelRecord};
use stamina_standards::RefinementPolicy;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    /// Registry configuration used when none is given on the command line.
    #[serde(default)]
    pub standards: Option<PathBuf>,
    #[serde(default)]
    pub scheme: Vec<SchemeSpec>,
    #[serde(default)]
    pub correspondence: Vec<CorrespondenceSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionSpec {
    pub family: String,
    pub version: String,
}

impl VersionSpec {
    pub fn resolve(&self) -> Result<ClassificationVersion> {
        ClassificationVersion::parse(&self.family, &self.version)
            .with_context(|| format!("invalid version {} {}", self.family, self.version))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeSpec {
    pub family: String,
    pub version: String,
    pub items: PathBuf,
    #[serde(default)]
    pub format: TableFormat,
    #[serde(default)]
    pub columns: ItemColumns,
    #[serde(default)]
    pub labels: Vec<LabelSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelSpec {
    pub path: PathBuf,
    #[serde(default)]
    pub format: TableFormat,
    pub columns: LabelColumns,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrespondenceSpec {
    pub source: VersionSpec,
    pub target: VersionSpec,
    pub records: PathBuf,
    #[serde(default)]
    pub format: TableFormat,
    #[serde(default)]
    pub columns: CorrespondenceColumns,
    /// Name of a rule preset; without one every association is unspecified.
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub all_levels: bool,
}

impl CorrespondenceSpec {
    pub fn rule(&self, policy: RefinementPolicy) -> Result<CorrespondenceRule> {
        let source = self.source.resolve()?;
        let target = self.target.resolve()?;
        let rule = match &self.preset {
            Some(name) => CorrespondenceRule::preset(name, source, target)?,
            None => CorrespondenceRule::new(source, target),
        };
        Ok(rule
            .with_orientation(self.orientation)
            .with_all_levels(self.all_levels)
            .with_refinement_policy(policy))
    }
}

impl JobFile {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse job file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read job file {}", path.display()))?;
        Self::parse(&text).with_context(|| path.display().to_string())
    }

    /// The `standards` path, resolved against `base_dir`.
    pub fn standards_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.standards.as_deref().map(|path| resolve(base_dir, path))
    }

    /// Scheme jobs first, then correspondences, each in file order.
    ///
    /// Invalid versions and unknown presets fail here, before any job runs.
    pub fn jobs(&self, base_dir: &Path, policy: RefinementPolicy) -> Result<Vec<Job>> {
        let mut jobs = Vec::with_capacity(self.scheme.len() + self.correspondence.len());
        for spec in &self.scheme {
            let version = ClassificationVersion::parse(&spec.family, &spec.version)
                .with_context(|| format!("invalid version {} {}", spec.family, spec.version))?;
            let labels = spec
                .labels
                .iter()
                .map(|label| {
                    Box::new(CsvLabels {
                        path: resolve(base_dir, &label.path),
                        format: label.format.clone(),
                        columns: label.columns.clone(),
                    }) as Box<dyn RecordSource<LabelRecord>>
                })
                .collect();
            jobs.push(Job::Scheme(SchemeJob {
                version,
                items: Box::new(CsvItems {
                    path: resolve(base_dir, &spec.items),
                    format: spec.format.clone(),
                    columns: spec.columns.clone(),
                }),
                labels,
            }));
        }
        for spec in &self.correspondence {
            let rule = spec.rule(policy).with_context(|| {
                format!(
                    "correspondence {} {} -> {} {}",
                    spec.source.family, spec.source.version, spec.target.family, spec.target.version
                )
            })?;
            jobs.push(Job::Correspondence(CorrespondenceJob {
                rule,
                records: Box::new(CsvCorrespondences {
                    path: resolve(base_dir, &spec.records),
                    format: spec.format.clone(),
                    columns: spec.columns.clone(),
                }),
            }));
        }
        Ok(jobs)
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base_dir.join(path)
    } else {
        path.to_path_buf()
    }
}
