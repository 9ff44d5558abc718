#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use stamina_core::{
    CorrespondenceJob, CsvItems, CsvLabels, GraphSink, InMemory, Job, JobKind, JobOutcome,
    MemoryGraph, SchemeAssembler, SchemeJob, SinkError, SinkResult,
};
use stamina_ingest::{ItemColumns, LabelColumns, TableFormat};
use stamina_map::CorrespondenceRule;
use stamina_model::{
    ClassificationVersion, CorrespondenceRecord, Identifier, ItemRecord, Label, MatchKind, Note,
};
use stamina_standards::{FamilyRegistry, NamingResolver};

fn version(family: &str, label: &str) -> ClassificationVersion {
    ClassificationVersion::parse(family, label).expect("version")
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("stamina_core_{}_{name}_{stamp}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write file");
    path
}

fn cpc_job() -> Job {
    Job::Scheme(SchemeJob {
        version: version("CPC", "2.1"),
        items: Box::new(InMemory::new(
            "cpc",
            vec![
                ItemRecord::new("0", "Agriculture"),
                ItemRecord::new("01", "Crop"),
                ItemRecord::new("011", "Cereals"),
            ],
        )),
        labels: Vec::new(),
    })
}

fn short(id: &str) -> &str {
    id.strip_prefix("http://stamina-project.org/codes/").unwrap_or(id)
}

#[test]
fn scheme_is_emitted_in_stable_order() {
    let registry = FamilyRegistry::builtin();
    let assembler = SchemeAssembler::new(NamingResolver::new(&registry));
    let mut graph = MemoryGraph::new();
    let reports = assembler.run(&[cpc_job()], &mut graph);
    assert!(!reports[0].is_failed());

    let mut lines = Vec::new();
    for scheme in &graph.schemes {
        lines.push(format!("scheme {} {}", short(scheme.id.as_str()), scheme.notation));
    }
    for level in &graph.levels {
        lines.push(format!("level {} {}", level.depth, short(level.id.as_str())));
    }
    for item in &graph.items {
        lines.push(format!(
            "item {} {} @ {}",
            short(item.id.as_str()),
            item.labels[0].text,
            short(item.level.as_str())
        ));
    }
    for edge in &graph.edges {
        lines.push(format!(
            "edge {} > {}",
            short(edge.broader.as_str()),
            short(edge.narrower.as_str())
        ));
    }
    for top in &graph.top_concepts {
        lines.push(format!("top {}", short(top.item.as_str())));
    }
    insta::assert_snapshot!(lines.join("\n"), @r"
    scheme cpcv21/cpc CPC Ver.2.1
    level 1 cpcv21/sections
    level 2 cpcv21/divisions
    level 3 cpcv21/groups
    level 4 cpcv21/classes
    level 5 cpcv21/subclasses
    item cpcv21/division/01 Crop @ cpcv21/divisions
    item cpcv21/group/011 Cereals @ cpcv21/groups
    item cpcv21/section/0 Agriculture @ cpcv21/sections
    edge cpcv21/section/0 > cpcv21/division/01
    edge cpcv21/division/01 > cpcv21/group/011
    top cpcv21/section/0
    ");
}

#[test]
fn failed_jobs_are_isolated() {
    let registry = FamilyRegistry::builtin();
    let assembler = SchemeAssembler::new(NamingResolver::new(&registry));
    let missing = std::env::temp_dir().join("stamina_core_missing_dir/isic.csv");

    let jobs = vec![
        Job::Scheme(SchemeJob {
            version: version("ISIC", "4"),
            items: Box::new(CsvItems {
                path: missing,
                format: TableFormat::default(),
                columns: ItemColumns::default(),
            }),
            labels: Vec::new(),
        }),
        Job::Correspondence(CorrespondenceJob {
            rule: CorrespondenceRule::new(version("NACE", "2"), version("GICS", "2018")),
            records: Box::new(InMemory::new("gics", vec![CorrespondenceRecord::new("01", "10")])),
        }),
        cpc_job(),
        Job::Correspondence(CorrespondenceJob {
            rule: CorrespondenceRule::preset(
                "cross-version",
                version("CPC", "2"),
                version("CPC", "2.1"),
            )
            .expect("preset"),
            records: Box::new(InMemory::new(
                "cpc2-cpc21",
                vec![
                    CorrespondenceRecord::new("01111", "01111"),
                    CorrespondenceRecord::new("n/a", "01112"),
                ],
            )),
        }),
    ];

    let mut graph = MemoryGraph::new();
    let reports = assembler.run(&jobs, &mut graph);
    let failed: Vec<&str> = reports
        .iter()
        .filter(|r| r.is_failed())
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(failed, vec!["ISIC 4", "NACE 2 -> GICS 2018"]);

    match &reports[0].outcome {
        JobOutcome::Failed { reason } => assert!(reason.starts_with("load items from")),
        JobOutcome::Built(_) => panic!("missing file must fail"),
    }
    match &reports[3].outcome {
        JobOutcome::Built(report) => {
            assert_eq!(report.associations, 1);
            assert_eq!(report.skipped, 1);
        }
        JobOutcome::Failed { reason } => panic!("unexpected failure: {reason}"),
    }
    assert_eq!(reports[3].kind, JobKind::Correspondence);

    assert_eq!(graph.schemes.len(), 1);
    assert_eq!(graph.correspondences.len(), 1);
    assert_eq!(graph.associations.len(), 1);
    assert_eq!(graph.items.len(), 3);
}

#[test]
fn csv_sources_feed_items_and_extra_labels() {
    let items = temp_file(
        "isic4_en.csv",
        "Code,Description\nA,\"Agriculture, forestry and fishing\"\n01,Crop and animal production\n011,Growing of non-perennial crops\n",
    );
    let labels = temp_file(
        "isic4_fr.csv",
        "Code,Libelle\n01,Culture et production animale\n011,Cultures non permanentes\n",
    );
    let registry = FamilyRegistry::builtin().with_section_table(
        stamina_standards::ISIC_SECTIONS,
        stamina_standards::SectionTable::from_pairs([("01", "A")]),
    );
    let assembler = SchemeAssembler::new(NamingResolver::new(&registry));
    let job = Job::Scheme(SchemeJob {
        version: version("ISIC", "4"),
        items: Box::new(CsvItems {
            path: items.clone(),
            format: TableFormat::default(),
            columns: ItemColumns::new("Code", "Description"),
        }),
        labels: vec![Box::new(CsvLabels {
            path: labels.clone(),
            format: TableFormat::default(),
            columns: LabelColumns::new("Code", "Libelle", "fr"),
        })],
    });

    let mut graph = MemoryGraph::new();
    let reports = assembler.run(&[job], &mut graph);
    match &reports[0].outcome {
        JobOutcome::Built(report) => {
            assert_eq!(report.items, 3);
            assert_eq!(report.top_concepts, 1);
            assert_eq!(report.labels_added, 2);
            assert_eq!(report.stubs, 0);
        }
        JobOutcome::Failed { reason } => panic!("unexpected failure: {reason}"),
    }
    let json = serde_json::to_value(&reports[0]).expect("serialize report");
    assert_eq!(json["outcome"]["status"], "built");
    assert_eq!(json["kind"], "scheme");

    let section = graph
        .items
        .iter()
        .find(|item| item.code == "A")
        .expect("section");
    assert_eq!(graph.narrower_of(&section.id).len(), 1);

    let _ = fs::remove_dir_all(items.parent().expect("parent"));
    let _ = fs::remove_dir_all(labels.parent().expect("parent"));
}

/// Records into a [`MemoryGraph`] but refuses items of one code.
struct RefusingSink {
    graph: MemoryGraph,
    refused_code: &'static str,
}

impl GraphSink for RefusingSink {
    fn begin(&mut self) -> SinkResult {
        self.graph.begin()
    }

    fn commit(&mut self) -> SinkResult {
        self.graph.commit()
    }

    fn rollback(&mut self) {
        self.graph.rollback();
    }

    fn create_scheme(&mut self, id: &Identifier, labels: &[Label], notation: &str) -> SinkResult {
        self.graph.create_scheme(id, labels, notation)
    }

    fn create_level(
        &mut self,
        id: &Identifier,
        depth: u8,
        labels: &[Label],
        notation_pattern: Option<&str>,
    ) -> SinkResult {
        self.graph.create_level(id, depth, labels, notation_pattern)
    }

    fn create_item(
        &mut self,
        id: &Identifier,
        code: &str,
        labels: &[Label],
        notes: &[Note],
        level: &Identifier,
    ) -> SinkResult {
        if code == self.refused_code {
            return Err(SinkError::new("create_item", id, "store rejected the item"));
        }
        self.graph.create_item(id, code, labels, notes, level)
    }

    fn link_broader_narrower(&mut self, parent: &Identifier, child: &Identifier) -> SinkResult {
        self.graph.link_broader_narrower(parent, child)
    }

    fn mark_top_concept(&mut self, item: &Identifier, scheme: &Identifier) -> SinkResult {
        self.graph.mark_top_concept(item, scheme)
    }

    fn create_correspondence(
        &mut self,
        id: &Identifier,
        compares: &[Identifier; 2],
        definitions: &[Label],
    ) -> SinkResult {
        self.graph.create_correspondence(id, compares, definitions)
    }

    fn create_association(
        &mut self,
        id: &Identifier,
        sources: &[Identifier],
        target: &Identifier,
        match_kind: MatchKind,
        label: &str,
        comment: Option<&str>,
    ) -> SinkResult {
        self.graph
            .create_association(id, sources, target, match_kind, label, comment)
    }
}

#[test]
fn sink_failure_midway_leaves_no_partial_scheme() {
    let registry = FamilyRegistry::builtin();
    let assembler = SchemeAssembler::new(NamingResolver::new(&registry));
    let jobs = vec![
        cpc_job(),
        Job::Scheme(SchemeJob {
            version: version("CPC", "2"),
            items: Box::new(InMemory::new(
                "cpc2",
                vec![
                    ItemRecord::new("0", "Agriculture"),
                    ItemRecord::new("01", "Crop"),
                ],
            )),
            labels: Vec::new(),
        }),
    ];

    // Only CPC 2.1 has a "011" item; its scheme and levels are already
    // written when the item is refused.
    let mut sink = RefusingSink {
        graph: MemoryGraph::new(),
        refused_code: "011",
    };
    let reports = assembler.run(&jobs, &mut sink);

    match &reports[0].outcome {
        JobOutcome::Failed { reason } => assert!(reason.contains("create_item failed")),
        JobOutcome::Built(_) => panic!("refused item must fail the job"),
    }
    assert!(!reports[1].is_failed());

    let graph = &sink.graph;
    assert_eq!(graph.schemes.len(), 1);
    assert_eq!(graph.levels.len(), 5);
    assert_eq!(graph.items.len(), 2);
    assert!(graph.items.iter().all(|item| item.id.as_str().contains("/cpcv2/")));
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.top_concepts.len(), 1);
}

#[test]
fn rollback_without_begin_keeps_the_graph() {
    let mut graph = MemoryGraph::new();
    let id = Identifier::new("http://example.org/s");
    graph.create_scheme(&id, &[], "S").expect("scheme");
    graph.rollback();
    assert_eq!(graph.node_count(), 1);

    graph.begin().expect("begin");
    graph.create_level(&id, 1, &[], None).expect("level");
    graph.rollback();
    assert_eq!(graph.node_count(), 1);
    assert!(graph.levels.is_empty());
}
