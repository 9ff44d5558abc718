#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use stamina_ingest::{
    ColumnRef, CorrespondenceColumns, ItemColumns, LabelColumns, TableFormat,
    read_correspondences, read_items, read_labels, read_table,
};
use stamina_model::NoteKind;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("stamina_ingest_{}_{name}_{stamp}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write file");
    path
}

fn cleanup(path: &PathBuf) {
    let _ = fs::remove_dir_all(path.parent().expect("parent"));
}

#[test]
fn reads_items_with_notes_and_bom() {
    let path = temp_file(
        "isic.csv",
        "\u{feff}Code;Description;Includes;Excludes\nA;Agriculture, forestry and fishing;;\n01;Crop and animal production;Growing of crops;Forestry\n\n;Orphan label;;\n",
    );
    let format = TableFormat::default().with_delimiter(';');
    let columns = ItemColumns::new("code", "Description")
        .with_note(NoteKind::Inclusion, "Includes")
        .with_note(NoteKind::Exclusion, "Excludes");

    let records = read_items(&path, &format, &columns).expect("read items");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].code, "A");
    assert!(records[0].notes.is_empty());
    assert_eq!(records[1].label, "Crop and animal production");
    assert_eq!(
        records[1].notes.get(&NoteKind::Inclusion).map(String::as_str),
        Some("Growing of crops")
    );
    assert_eq!(
        records[1].notes.get(&NoteKind::Exclusion).map(String::as_str),
        Some("Forestry")
    );
    assert_eq!(records[1].language, "en");
    assert_eq!(records[2].code, "");
    cleanup(&path);
}

#[test]
fn skips_title_rows_before_the_header() {
    let path = temp_file(
        "hs.csv",
        "Harmonized System 2017\n\nCode,Parent,Label\n01,I,Live animals\n0101,01,\"Horses, asses, mules\"\n",
    );
    let format = TableFormat::default().skipping(1);
    let columns = ItemColumns::new("Code", "Label")
        .with_parent("Parent")
        .with_language("fr");

    let records = read_items(&path, &format, &columns).expect("read items");
    let rendered: Vec<String> = records
        .iter()
        .map(|r| {
            format!(
                "{} <{}> {} [{}]",
                r.code,
                r.parent.as_deref().unwrap_or("-"),
                r.label,
                r.language
            )
        })
        .collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    01 <I> Live animals [fr]
    0101 <01> Horses, asses, mules [fr]
    ");
    cleanup(&path);
}

#[test]
fn missing_named_column_fails_the_file() {
    let path = temp_file("broken.csv", "Code,Title\n01,Crop\n");
    let err = read_items(&path, &TableFormat::default(), &ItemColumns::new("Code", "Label"))
        .expect_err("missing column");
    assert!(err.to_string().contains("missing column Label"));
    cleanup(&path);
}

#[test]
fn unreadable_file_is_an_error() {
    let path = std::env::temp_dir().join("stamina_ingest_does_not_exist.csv");
    assert!(read_table(&path, &TableFormat::default()).is_err());
}

#[test]
fn reads_additional_labels() {
    let path = temp_file(
        "labels_fr.csv",
        "Code,Libellé\n01,Culture et production animale\n02,\n",
    );
    let columns = LabelColumns::new(0, 1, "fr");
    let records = read_labels(&path, &TableFormat::default(), &columns).expect("read labels");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].code, "01");
    assert_eq!(records[0].language, "fr");
    cleanup(&path);
}

#[test]
fn reads_correspondences_by_index_without_header() {
    let path = temp_file(
        "cpc2_cpc21.txt",
        "01111\t01111\tyes\t0\n01112\t01112\tNo\tFALSE\nn/a\t01113\t\t\n",
    );
    let format = TableFormat::default().with_delimiter('\t').without_header();
    let columns = CorrespondenceColumns::new(0, 1)
        .with_partials(Some(ColumnRef::Index(2)), Some(ColumnRef::Index(3)));

    let records = read_correspondences(&path, &format, &columns).expect("read table");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].source_partial, Some(true));
    assert_eq!(records[0].target_partial, Some(false));
    assert_eq!(records[1].source_partial, Some(false));
    assert_eq!(records[2].source_code, "n/a");
    assert_eq!(records[2].source_partial, None);
    cleanup(&path);
}

#[test]
fn reads_correspondence_comments_by_name() {
    let path = temp_file(
        "nace_cpa.csv",
        "CPA,NACE,Remark\n01.11.11,01.11,\n01.11.12,01.11,durum only\n",
    );
    let columns = CorrespondenceColumns::new("NACE", "CPA").with_comment("remark");
    let records =
        read_correspondences(&path, &TableFormat::default(), &columns).expect("read table");
    assert_eq!(records[0].source_code, "01.11");
    assert_eq!(records[0].target_code, "01.11.11");
    assert_eq!(records[0].comment, None);
    assert_eq!(records[1].comment.as_deref(), Some("durum only"));
    cleanup(&path);
}

#[test]
fn non_ascii_delimiter_falls_back_to_comma() {
    let path = temp_file("sic.csv", "Code,Label\n01110,Growing of cereals\n");
    let table = read_table(&path, &TableFormat::default().with_delimiter('§')).expect("read");
    assert_eq!(table.headers, vec!["Code", "Label"]);
    assert_eq!(table.cell(0, 1), "Growing of cereals");
    cleanup(&path);
}
