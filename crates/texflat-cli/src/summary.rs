use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use texflat_cli::pipeline::{ArtifactKind, ArtifactSummary, BuildReport, display_relative};

pub fn print_summary(report: &BuildReport) {
    println!("Project: {}", report.project_root.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Artifact"),
        header_cell("Path"),
        header_cell("Preamble"),
        header_cell("Body"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for artifact in &report.artifacts {
        table.add_row(artifact_row(artifact, report));
    }
    println!("{table}");

    if let Some(outcome) = &report.compile {
        if !outcome.stderr.is_empty() {
            eprintln!("{}", outcome.stderr.trim_end());
        }
        if !outcome.success {
            let code = outcome
                .code
                .map_or_else(|| "signal".to_string(), |code| code.to_string());
            eprintln!("Compiler failed (exit {code}).");
            return;
        }
        println!("Typeset, done.");
    }
}

fn artifact_row(artifact: &ArtifactSummary, report: &BuildReport) -> Vec<Cell> {
    vec![
        kind_cell(artifact.kind),
        Cell::new(display_relative(&artifact.path, &report.project_root)),
        Cell::new(artifact.preamble_lines),
        Cell::new(artifact.document_lines),
    ]
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn kind_cell(kind: ArtifactKind) -> Cell {
    match kind {
        ArtifactKind::Main => Cell::new(kind.label())
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        ArtifactKind::Init => Cell::new(kind.label()).fg(Color::DarkGrey),
    }
}
