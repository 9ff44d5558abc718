#![allow(missing_docs)]

use std::path::Path;

use stamina_cli::jobs::JobFile;
use stamina_core::{Job, JobKind};
use stamina_ingest::ColumnRef;
use stamina_map::{MatchRule, Orientation};
use stamina_model::Side;
use stamina_standards::RefinementPolicy;

const JOBS: &str = r#"
standards = "standards.toml"

[[scheme]]
family = "ISIC"
version = "4"
items = "isic/ISIC4_en.csv"
format = { delimiter = ";", skip_rows = 1 }
columns = { code = "Code", label = "Description", notes = { inclusion = "Includes" } }

[[scheme.labels]]
path = "/data/isic/ISIC4_fr.csv"
columns = { code = "Code", label = "Libelle", language = "fr" }

[[scheme]]
family = "cpc"
version = "2.1"
items = "cpc.csv"

[[correspondence]]
source = { family = "NACE", version = "2" }
target = { family = "SBI", version = "2008" }
records = "sbi.csv"
preset = "nace-sbi"
orientation = "swapped"
columns = { first = 0, second = 1, comment = "Remark" }

[[correspondence]]
source = { family = "NACE", version = "2" }
target = { family = "CPA", version = "2.1" }
records = "cpa.csv"
preset = "nace-cpa"
all_levels = true
"#;

#[test]
fn parses_schemes_and_correspondences() {
    let file = JobFile::parse(JOBS).expect("parse jobs");
    assert_eq!(file.scheme.len(), 2);
    assert_eq!(file.correspondence.len(), 2);

    let isic = &file.scheme[0];
    assert_eq!(isic.format.delimiter, ';');
    assert_eq!(isic.format.skip_rows, 1);
    assert!(isic.format.has_header);
    assert_eq!(isic.columns.code, ColumnRef::name("Code"));
    assert_eq!(isic.columns.notes.len(), 1);
    assert_eq!(isic.labels[0].columns.language, "fr");

    let cpc = &file.scheme[1];
    assert_eq!(cpc.format.delimiter, ',');
    assert_eq!(cpc.columns.language, "en");

    let sbi = &file.correspondence[0];
    assert_eq!(sbi.orientation, Orientation::Swapped);
    assert!(!sbi.all_levels);
    assert!(sbi.columns.comment.is_some());
}

#[test]
fn builds_jobs_with_resolved_paths() {
    let file = JobFile::parse(JOBS).expect("parse jobs");
    let base = Path::new("/work/jobs");
    assert_eq!(
        file.standards_path(base).as_deref(),
        Some(Path::new("/work/jobs/standards.toml"))
    );

    let jobs = file.jobs(base, RefinementPolicy::SameCode).expect("jobs");
    let summary: Vec<(JobKind, String)> = jobs.iter().map(|j| (j.kind(), j.name())).collect();
    assert_eq!(
        summary,
        vec![
            (JobKind::Scheme, "ISIC 4".to_string()),
            (JobKind::Scheme, "CPC 2.1".to_string()),
            (JobKind::Correspondence, "NACE 2 -> SBI 2008".to_string()),
            (JobKind::Correspondence, "NACE 2 -> CPA 2.1".to_string()),
        ]
    );

    let Job::Scheme(isic) = &jobs[0] else {
        panic!("first job is a scheme");
    };
    assert_eq!(isic.items.describe(), "/work/jobs/isic/ISIC4_en.csv");
    assert_eq!(isic.labels[0].describe(), "/data/isic/ISIC4_fr.csv");

    let Job::Correspondence(sbi) = &jobs[2] else {
        panic!("third job is a correspondence");
    };
    assert_eq!(
        sbi.rule.match_rule,
        MatchRule::Refinement(RefinementPolicy::SameCode)
    );
    assert_eq!(sbi.rule.orientation, Orientation::Swapped);
    assert_eq!(sbi.records.describe(), "/work/jobs/sbi.csv");

    let Job::Correspondence(cpa) = &jobs[3] else {
        panic!("fourth job is a correspondence");
    };
    assert_eq!(cpa.rule.keep_length, None);
    assert_eq!(cpa.rule.derive.map(|d| d.side), Some(Side::Source));
}

#[test]
fn unknown_preset_fails_before_running() {
    let file = JobFile::parse(
        r#"
[[correspondence]]
source = { family = "NACE", version = "2" }
target = { family = "GICS", version = "2018" }
records = "gics.csv"
preset = "nace-gics"
"#,
    )
    .expect("parse jobs");
    let err = match file.jobs(Path::new("."), RefinementPolicy::Never) {
        Ok(_) => panic!("unknown preset must fail"),
        Err(err) => format!("{err:#}"),
    };
    assert!(err.starts_with("correspondence NACE 2 -> GICS 2018"));
    assert!(err.contains("nace-gics"));
}

#[test]
fn unknown_keys_are_rejected() {
    let err = JobFile::parse("[[scheme]]\nfamily = \"CPC\"\nversion = \"2\"\nitems = \"a.csv\"\nlevels = 3\n")
        .expect_err("unknown key");
    assert!(format!("{err:#}").contains("levels"));
}

#[test]
fn empty_file_has_no_jobs() {
    let file = JobFile::parse("").expect("parse");
    assert!(file.standards.is_none());
    let jobs = file.jobs(Path::new("."), RefinementPolicy::Never).expect("jobs");
    assert!(jobs.is_empty());
}
