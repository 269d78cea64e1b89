//! Command execution for the pagestat CLI.

use std::fs;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{debug, info, warn};

use pagestat_codec::{Converter, GroupFamily, decode_snapshots};
use pagestat_model::{PageRow, RecordSchema};

use crate::cli::IngestArgs;
use crate::summary::apply_table_style;
use crate::types::{IngestReport, RowFailure};

/// Decodes the given file into page snapshots, skipping failed rows and
/// collecting them into the report.
pub fn run_ingest(args: &IngestArgs) -> Result<IngestReport> {
    let data = fs::read(&args.file)
        .with_context(|| format!("read input file {}", args.file.display()))?;
    debug!(bytes = data.len(), file = %args.file.display(), "read input file");

    let converter = Converter::default();
    let results = decode_snapshots(&converter, &data, args.check_headers)
        .context("decode tabular input")?;

    let mut snapshots = Vec::new();
    let mut failures = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        // Row numbering is 1-based and counts data rows, not the header.
        let row = index + 1;
        match result {
            Ok(snapshot) => {
                debug!(row, page = %snapshot.page, "structured row");
                snapshots.push(snapshot);
            }
            Err(error) => {
                warn!(row, %error, "skipping row");
                failures.push(RowFailure {
                    row,
                    error: error.to_string(),
                });
            }
        }
    }
    info!(
        rows = snapshots.len() + failures.len(),
        ok = snapshots.len(),
        skipped = failures.len(),
        "ingest finished"
    );
    Ok(IngestReport {
        file: args.file.clone(),
        snapshots,
        failures,
    })
}

/// Prints the expected column layout of the scraped table: one line per
/// column with its internal identifier and its role.
pub fn run_columns() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Column", "Identifier", "Role"]);
    apply_table_style(&mut table);
    let map = PageRow::alias_map();
    for column in map.columns() {
        let identifier = map.ident_of(column).unwrap_or_default();
        table.add_row(vec![column, identifier, column_role(column)]);
    }
    println!("{table}");
    Ok(())
}

fn column_role(column: &str) -> &'static str {
    match GroupFamily::classify(column) {
        Some(GroupFamily::Traffic) => "group: monthly traffic",
        Some(GroupFamily::Countries) => "group: top countries",
        Some(GroupFamily::Demographics) => "group: demographics",
        None => "scalar",
    }
}
