//! Batch orchestration.
//!
//! Each job is built to completion before anything is handed to the sink.
//! A job that fails, even halfway through writing, is rolled back out of the
//! sink. Remaining jobs still run.

use std::fmt;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use stamina_map::{CorrespondenceBuilder, CorrespondenceRule};
use stamina_model::{ClassificationVersion, CorrespondenceRecord, ItemRecord, LabelRecord};
use stamina_standards::NamingResolver;
use tracing::{error, info, info_span};

use crate::hierarchy::HierarchyBuilder;
use crate::sink::{GraphSink, SinkResult, write_correspondence, write_scheme};
use crate::sources::RecordSource;

pub struct SchemeJob {
    pub version: ClassificationVersion,
    pub items: Box<dyn RecordSource<ItemRecord>>,
    /// Additional-language labels, merged in order.
    pub labels: Vec<Box<dyn RecordSource<LabelRecord>>>,
}

pub struct CorrespondenceJob {
    pub rule: CorrespondenceRule,
    pub records: Box<dyn RecordSource<CorrespondenceRecord>>,
}

pub enum Job {
    Scheme(SchemeJob),
    Correspondence(CorrespondenceJob),
}

impl Job {
    pub fn name(&self) -> String {
        match self {
            Job::Scheme(job) => job.version.to_string(),
            Job::Correspondence(job) => format!("{} -> {}", job.rule.source, job.rule.target),
        }
    }

    pub fn kind(&self) -> JobKind {
        match self {
            Job::Scheme(_) => JobKind::Scheme,
            Job::Correspondence(_) => JobKind::Correspondence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Scheme,
    Correspondence,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Scheme => f.write_str("scheme"),
            JobKind::Correspondence => f.write_str("correspondence"),
        }
    }
}

/// Counts for one successful job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Items populated from a record.
    pub items: usize,
    /// Parents referenced but never populated.
    pub stubs: usize,
    pub skipped: usize,
    pub top_concepts: usize,
    pub labels_added: usize,
    pub associations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobOutcome {
    Built(BuildReport),
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    pub name: String,
    pub kind: JobKind,
    pub outcome: JobOutcome,
}

impl JobReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, JobOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SchemeAssembler<'a> {
    hierarchy: HierarchyBuilder<'a>,
    correspondences: CorrespondenceBuilder<'a>,
}

impl<'a> SchemeAssembler<'a> {
    pub fn new(naming: NamingResolver<'a>) -> Self {
        Self {
            hierarchy: HierarchyBuilder::new(naming),
            correspondences: CorrespondenceBuilder::new(naming),
        }
    }

    /// Runs every job in order. A failing job is reported and skipped.
    pub fn run(&self, jobs: &[Job], sink: &mut dyn GraphSink) -> Vec<JobReport> {
        jobs.iter()
            .map(|job| {
                let name = job.name();
                let result = match job {
                    Job::Scheme(job) => self.assemble_scheme(job, sink),
                    Job::Correspondence(job) => self.assemble_correspondence(job, sink),
                };
                let outcome = match result {
                    Ok(report) => JobOutcome::Built(report),
                    Err(err) => {
                        let reason = format!("{err:#}");
                        error!(job = %name, error = %reason, "job failed");
                        JobOutcome::Failed { reason }
                    }
                };
                JobReport {
                    name,
                    kind: job.kind(),
                    outcome,
                }
            })
            .collect()
    }

    pub fn assemble_scheme(&self, job: &SchemeJob, sink: &mut dyn GraphSink) -> Result<BuildReport> {
        let span = info_span!(
            "scheme",
            family = %job.version.family,
            version = %job.version.version
        );
        let _enter = span.enter();
        let started = Instant::now();

        let records = job
            .items
            .load()
            .with_context(|| format!("load items from {}", job.items.describe()))?;
        let outcome = self.hierarchy.build(&job.version, records)?;
        let mut scheme = outcome.scheme;

        let mut labels_added = 0usize;
        for source in &job.labels {
            let labels = source
                .load()
                .with_context(|| format!("load labels from {}", source.describe()))?;
            labels_added += self.hierarchy.merge_labels(&mut scheme, labels).added;
        }

        write_job(sink, |sink| write_scheme(&scheme, sink))?;
        let report = BuildReport {
            items: scheme.populated_count(),
            stubs: scheme.items.stubs().count(),
            skipped: outcome.skipped,
            top_concepts: scheme.top_concepts.len(),
            labels_added,
            associations: 0,
        };
        info!(
            items = report.items,
            stubs = report.stubs,
            skipped = report.skipped,
            top_concepts = report.top_concepts,
            duration_ms = elapsed_ms(started),
            "scheme built"
        );
        Ok(report)
    }

    pub fn assemble_correspondence(
        &self,
        job: &CorrespondenceJob,
        sink: &mut dyn GraphSink,
    ) -> Result<BuildReport> {
        let span = info_span!(
            "correspondence",
            source = %job.rule.source,
            target = %job.rule.target
        );
        let _enter = span.enter();
        let started = Instant::now();

        let records = job
            .records
            .load()
            .with_context(|| format!("load records from {}", job.records.describe()))?;
        let outcome = self.correspondences.build(&job.rule, records)?;
        write_job(sink, |sink| write_correspondence(&outcome.correspondence, sink))?;

        let report = BuildReport {
            skipped: outcome.skipped + outcome.pruned,
            associations: outcome.correspondence.len(),
            ..BuildReport::default()
        };
        info!(
            associations = report.associations,
            skipped = report.skipped,
            duration_ms = elapsed_ms(started),
            "correspondence written"
        );
        Ok(report)
    }
}

/// Writes one job's output, rolling it back if any call fails.
fn write_job<F>(sink: &mut dyn GraphSink, write: F) -> SinkResult
where
    F: FnOnce(&mut dyn GraphSink) -> SinkResult,
{
    sink.begin()?;
    match write(sink).and_then(|()| sink.commit()) {
        Ok(()) => Ok(()),
        Err(err) => {
            sink.rollback();
            Err(err)
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
