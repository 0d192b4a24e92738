use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use roster_model::{CompiledRosters, Diagnosis, DiagnosisBreakdown, ErrorEntry, Locale};

use crate::types::RunResult;

/// Flagged students listed on screen before truncating.
const FLAGGED_PREVIEW: usize = 25;

pub fn print_summary(result: &RunResult, show_rosters: bool) {
    let validation = &result.validation;
    println!("Roster: {}", result.input.display());
    println!("Taxonomy: {}", result.taxonomy);

    println!("{}", breakdown_table(&validation.breakdown, result.locale));

    if show_rosters {
        print_roster_table(&validation.rosters);
    } else {
        print_flagged_table(&validation.errors, result.locale);
    }

    if !result.outputs.is_empty() {
        println!("Written:");
        for path in &result.outputs {
            println!("- {}", path.display());
        }
    }
}

/// One row per display label, so both OK variants share a row as in the CSV.
fn breakdown_table(breakdown: &DiagnosisBreakdown, locale: Locale) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Diagnostic"), header_cell("Students")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (diagnosis, label, count) in breakdown.by_label(locale) {
        table.add_row(vec![
            diagnosis_cell(diagnosis, label),
            count_cell(count, diagnosis),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(breakdown.total()).add_attribute(Attribute::Bold),
    ]);
    table
}

fn print_flagged_table(errors: &[ErrorEntry], locale: Locale) {
    if errors.is_empty() {
        println!("No enrollment errors.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Nom"),
        header_cell("Prénom"),
        header_cell("Diagnostic"),
    ]);
    apply_table_style(&mut table);
    for entry in errors.iter().take(FLAGGED_PREVIEW) {
        table.add_row(vec![
            Cell::new(&entry.family_name),
            Cell::new(&entry.given_name),
            diagnosis_cell(entry.diagnosis, entry.diagnosis.label_for(locale)),
        ]);
    }
    println!();
    println!("Flagged students:");
    println!("{table}");
    if errors.len() > FLAGGED_PREVIEW {
        println!("... and {} more", errors.len() - FLAGGED_PREVIEW);
    }
}

fn print_roster_table(rosters: &CompiledRosters) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Roster"), header_cell("Students")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (key, entries) in &rosters.by_classe {
        table.add_row(vec![Cell::new(key.to_string()), Cell::new(entries.len())]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(rosters.placement_count()).add_attribute(Attribute::Bold),
    ]);
    println!();
    println!("Rosters:");
    println!("{table}");
    if rosters.excluded > 0 {
        println!("Excluded: {}", rosters.excluded);
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
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn diagnosis_cell(diagnosis: Diagnosis, label: &str) -> Cell {
    let cell = Cell::new(label);
    if diagnosis.is_ok() {
        cell.fg(Color::Green)
    } else {
        cell.fg(Color::Red)
    }
}

fn count_cell(count: usize, diagnosis: Diagnosis) -> Cell {
    if diagnosis.is_ok() {
        Cell::new(count)
    } else {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
