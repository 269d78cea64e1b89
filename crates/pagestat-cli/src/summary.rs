//! Terminal summary tables for ingest runs.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pagestat_model::PageSnapshot;

use crate::types::IngestReport;

pub fn print_ingest_summary(report: &IngestReport) {
    println!("File: {}", report.file.display());
    println!(
        "Rows: {} ({} structured, {} skipped)",
        report.rows_read(),
        report.snapshots.len(),
        report.failures.len()
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Page"),
        header_cell("Scraped At"),
        header_cell("Global Rank"),
        header_cell("Total Visits"),
        header_cell("Bounce"),
        header_cell("Pages/Visit"),
        header_cell("Avg Duration"),
        header_cell("Months"),
        header_cell("Countries"),
        header_cell("Brackets"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=9 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for snapshot in &report.snapshots {
        table.add_row(snapshot_row(snapshot));
    }
    println!("{table}");
    print_failure_table(report);
}

fn snapshot_row(snapshot: &PageSnapshot) -> Vec<Cell> {
    vec![
        Cell::new(&snapshot.page)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(snapshot.scraped_at.format("%Y-%m-%d %H:%M")),
        rank_cell(snapshot.global_rank),
        Cell::new(snapshot.total_visits),
        Cell::new(format!("{:.2}%", snapshot.bounce_rate)),
        Cell::new(format!("{:.2}", snapshot.pages_per_visit)),
        Cell::new(format_duration(snapshot.avg_visit_duration)),
        Cell::new(snapshot.monthly_traffic.len()),
        Cell::new(snapshot.top_countries.len()),
        Cell::new(snapshot.demographics.len()),
    ]
}

fn print_failure_table(report: &IngestReport) {
    if report.failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Row"), header_cell("Error")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for failure in &report.failures {
        table.add_row(vec![
            Cell::new(failure.row).fg(Color::Red),
            Cell::new(&failure.error),
        ]);
    }
    println!();
    println!("Skipped rows:");
    println!("{table}");
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
        .set_width(150);
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

fn rank_cell(rank: u64) -> Cell {
    if rank == 0 {
        dim_cell("-")
    } else {
        Cell::new(format!("#{rank}"))
    }
}

fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(635), "00:10:35");
        assert_eq!(format_duration(86_399), "23:59:59");
    }
}
