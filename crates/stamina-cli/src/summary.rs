use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use stamina_core::{BuildReport, JobOutcome, JobReport};

use crate::types::BuildResult;

pub fn print_summary(result: &BuildResult) {
    println!("Jobs: {}", result.job_file.display());
    println!("Output: {} ({} nodes)", result.output.display(), result.nodes);
    println!("{}", summary_table(&result.reports));
    let failures: Vec<&JobReport> = result.reports.iter().filter(|r| r.is_failed()).collect();
    if !failures.is_empty() {
        eprintln!("Failed jobs:");
        for report in failures {
            if let JobOutcome::Failed { reason } = &report.outcome {
                eprintln!("- {}: {reason}", report.name);
            }
        }
    }
}

pub fn summary_table(reports: &[JobReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Job"),
        header_cell("Kind"),
        header_cell("Items"),
        header_cell("Stubs"),
        header_cell("Top"),
        header_cell("Labels"),
        header_cell("Associations"),
        header_cell("Skipped"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 8, CellAlignment::Center);

    let mut total = BuildReport::default();
    for report in reports {
        let mut row = vec![Cell::new(&report.name), dim_cell(report.kind)];
        match &report.outcome {
            JobOutcome::Built(counts) => {
                total.items += counts.items;
                total.stubs += counts.stubs;
                total.top_concepts += counts.top_concepts;
                total.labels_added += counts.labels_added;
                total.associations += counts.associations;
                total.skipped += counts.skipped;
                row.extend(count_cells(counts));
                row.push(Cell::new("ok").fg(Color::Green));
            }
            JobOutcome::Failed { .. } => {
                row.extend((0..6).map(|_| dim_cell("-")));
                row.push(
                    Cell::new("failed")
                        .fg(Color::Red)
                        .add_attribute(Attribute::Bold),
                );
            }
        }
        table.add_row(row);
    }

    let mut totals = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
    ];
    totals.extend(
        count_cells(&total)
            .into_iter()
            .map(|cell| cell.add_attribute(Attribute::Bold)),
    );
    let failed = reports.iter().filter(|r| r.is_failed()).count();
    totals.push(if failed > 0 {
        Cell::new(format!("{failed} failed")).fg(Color::Red)
    } else {
        dim_cell("-")
    });
    table.add_row(totals);
    table
}

fn count_cells(report: &BuildReport) -> Vec<Cell> {
    vec![
        Cell::new(report.items),
        count_cell(report.stubs, Color::Yellow),
        Cell::new(report.top_concepts),
        Cell::new(report.labels_added),
        Cell::new(report.associations),
        count_cell(report.skipped, Color::Yellow),
    ]
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stamina_core::JobKind;

    fn built(name: &str, kind: JobKind, report: BuildReport) -> JobReport {
        JobReport {
            name: name.to_string(),
            kind,
            outcome: JobOutcome::Built(report),
        }
    }

    #[test]
    fn totals_skip_failed_jobs() {
        let reports = vec![
            built(
                "CPC 2.1",
                JobKind::Scheme,
                BuildReport {
                    items: 3,
                    top_concepts: 1,
                    ..BuildReport::default()
                },
            ),
            JobReport {
                name: "ISIC 4".to_string(),
                kind: JobKind::Scheme,
                outcome: JobOutcome::Failed {
                    reason: "load items from isic.csv".to_string(),
                },
            },
            built(
                "CPC 2 -> CPC 2.1",
                JobKind::Correspondence,
                BuildReport {
                    associations: 4,
                    skipped: 1,
                    ..BuildReport::default()
                },
            ),
        ];
        let table = summary_table(&reports);
        assert_eq!(table.row_count(), 4);

        let total: Vec<String> = table
            .row(3)
            .expect("total row")
            .cell_iter()
            .map(Cell::content)
            .collect();
        assert_eq!(total, vec!["TOTAL", "-", "3", "0", "1", "0", "4", "1", "1 failed"]);

        let failed: Vec<String> = table
            .row(1)
            .expect("failed row")
            .cell_iter()
            .map(Cell::content)
            .collect();
        assert_eq!(failed[2], "-");
        assert_eq!(failed[8], "failed");
    }
}
