use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use excipient_cli::types::{CatalogResult, RunResult};

pub fn print_run_summary(result: &RunResult) {
    println!("Input: {}", result.input.display());
    println!("Output: {}", result.output.display());
    println!("Strategy: {}  Layout: {}", result.strategy, result.layout);
    let mut table = Table::new();
    table.set_header(vec![header_cell("Measure"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Records read"), Cell::new(result.records)]);
    table.add_row(vec![Cell::new("Rows written"), Cell::new(result.rows)]);
    table.add_row(vec![
        Cell::new("From description"),
        Cell::new(result.sources.description),
    ]);
    table.add_row(vec![
        Cell::new("From excipients field"),
        Cell::new(result.sources.excipients_field),
    ]);
    table.add_row(vec![
        Cell::new("No excipient text"),
        count_cell(result.sources.missing, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Empty rows"),
        count_cell(result.empty_rows, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Unique excipients")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.unique_excipients).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_catalog_summary(result: &CatalogResult) {
    println!("Input: {}", result.input.display());
    println!("Output: {}", result.output.display());
    println!("Strategy: {}", result.strategy);
    println!(
        "{} distinct excipients from {} records",
        result.excipients, result.records
    );
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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
        .set_width(80);
}
