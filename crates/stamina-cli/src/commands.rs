use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use stamina_cli::jobs::JobFile;
use stamina_core::{MemoryGraph, SchemeAssembler};
use stamina_model::ClassificationVersion;
use stamina_standards::{FamilyRegistry, NamingResolver, StandardsConfig};

use crate::cli::{BuildArgs, NamesArgs};
use crate::summary::apply_table_style;
use crate::types::BuildResult;

/// Loads the registry configuration, if any. Relative section paths in it
/// resolve against its own directory.
pub fn load_standards(config: Option<&Path>) -> Result<(StandardsConfig, FamilyRegistry)> {
    let Some(path) = config else {
        let standards = StandardsConfig::default();
        let registry = standards.build_registry(None)?;
        return Ok((standards, registry));
    };
    let standards = StandardsConfig::load(path)?;
    let registry = standards
        .build_registry(path.parent())
        .with_context(|| format!("build registry from {}", path.display()))?;
    info!(config = %path.display(), "registry configured");
    Ok((standards, registry))
}

pub fn run_build(args: &BuildArgs, config: Option<&Path>) -> Result<BuildResult> {
    let span = info_span!("build", jobs = %args.job_file.display());
    let _guard = span.enter();
    let started = Instant::now();

    let job_file = JobFile::load(&args.job_file)?;
    let base_dir = args
        .job_file
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let config_path = config
        .map(Path::to_path_buf)
        .or_else(|| job_file.standards_path(&base_dir));
    let (standards, registry) = load_standards(config_path.as_deref())?;
    let jobs = job_file.jobs(&base_dir, standards.policy.refinement_exact)?;

    let assembler = SchemeAssembler::new(NamingResolver::new(&registry));
    let mut graph = MemoryGraph::new();
    let reports = assembler.run(&jobs, &mut graph);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.job_file.with_extension("json"));
    write_graph(&graph, &output)?;
    info!(
        jobs = reports.len(),
        nodes = graph.node_count(),
        output = %output.display(),
        duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "graph written"
    );

    Ok(BuildResult {
        job_file: args.job_file.clone(),
        output,
        reports,
        nodes: graph.node_count(),
    })
}

fn write_graph(graph: &MemoryGraph, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), graph)
        .with_context(|| format!("write graph to {}", path.display()))
}

pub fn run_families(config: Option<&Path>) -> Result<()> {
    let (_, registry) = load_standards(config)?;
    let mut table = Table::new();
    table.set_header(vec!["Family", "Levels", "Name"]);
    apply_table_style(&mut table);
    for row in family_rows(&registry) {
        table.add_row(row);
    }
    println!("{table}");
    Ok(())
}

pub fn family_rows(registry: &FamilyRegistry) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = registry
        .families()
        .map(|rule| {
            let levels: Vec<&str> = rule.levels.iter().map(|l| l.name.as_str()).collect();
            vec![
                rule.family.to_string(),
                levels.join(" > "),
                rule.long_name.clone().unwrap_or_default(),
            ]
        })
        .collect();
    rows.sort();
    rows
}

pub fn run_names(args: &NamesArgs, config: Option<&Path>) -> Result<()> {
    let (_, registry) = load_standards(config)?;
    let version = ClassificationVersion::parse(&args.family, &args.version)?;
    let naming = NamingResolver::new(&registry);
    let mut table = Table::new();
    table.set_header(vec!["Name", "Value"]);
    apply_table_style(&mut table);
    for (name, value) in name_rows(&naming, &version, args.code.as_deref()) {
        table.add_row(vec![name, value]);
    }
    println!("{table}");
    Ok(())
}

/// Identifiers and names for a version, plus those of `code` when given.
pub fn name_rows(
    naming: &NamingResolver<'_>,
    version: &ClassificationVersion,
    code: Option<&str>,
) -> Vec<(String, String)> {
    let mut rows = vec![
        ("context".to_string(), naming.context(version)),
        ("scheme".to_string(), naming.scheme_id(version).to_string()),
        ("name".to_string(), naming.display_name(version)),
    ];
    if let Some(long) = naming.long_name(version) {
        rows.push(("long name".to_string(), long));
    }
    let classifier = naming.classifier();
    for depth in 1..=classifier.level_count(version) {
        let Ok(depth) = u8::try_from(depth) else {
            break;
        };
        if let Some(id) = naming.level_id(version, depth) {
            rows.push((format!("level {depth}"), id.to_string()));
        }
    }
    let Some(code) = code else {
        return rows;
    };
    let code = classifier.normalize_code(version, code);
    rows.push(("code".to_string(), code.clone()));
    match naming.item_id(version, &code) {
        Some(id) => {
            rows.push(("item".to_string(), id.to_string()));
            if let Some(parent) = classifier.derive_parent(version, &code, None) {
                rows.push(("parent".to_string(), parent));
            }
        }
        None => rows.push(("item".to_string(), "-".to_string())),
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_cover_levels_and_item() {
        let registry = FamilyRegistry::builtin();
        let naming = NamingResolver::new(&registry);
        let version = ClassificationVersion::parse("CPC", "2.1").expect("version");
        let rows = name_rows(&naming, &version, Some("0111"));
        let find = |name: &str| {
            rows.iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(find("context"), Some("cpcv21"));
        assert_eq!(
            find("level 2"),
            Some("http://stamina-project.org/codes/cpcv21/divisions")
        );
        assert_eq!(
            find("item"),
            Some("http://stamina-project.org/codes/cpcv21/class/0111")
        );
        assert_eq!(find("parent"), Some("011"));
    }

    #[test]
    fn unclassifiable_code_has_no_item() {
        let registry = FamilyRegistry::builtin();
        let naming = NamingResolver::new(&registry);
        let version = ClassificationVersion::parse("CPC", "2.1").expect("version");
        let rows = name_rows(&naming, &version, Some("0123456"));
        assert_eq!(rows.last(), Some(&("item".to_string(), "-".to_string())));
    }

    #[test]
    fn families_are_sorted_by_code() {
        let rows = family_rows(&FamilyRegistry::builtin());
        let codes: Vec<&str> = rows.iter().map(|row| row[0].as_str()).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
        assert!(codes.contains(&"NAICS"));
        let cpc = rows.iter().find(|row| row[0] == "CPC").expect("cpc");
        assert!(cpc[1].starts_with("section > division"));
    }
}
