//! Result types shared between command execution and summary printing.

use std::path::PathBuf;

use pagestat_model::PageSnapshot;

/// Outcome of one `ingest` run over a scraped CSV file.
#[derive(Debug)]
pub struct IngestReport {
    pub file: PathBuf,
    pub snapshots: Vec<PageSnapshot>,
    pub failures: Vec<RowFailure>,
}

impl IngestReport {
    pub fn rows_read(&self) -> usize {
        self.snapshots.len() + self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// One skipped row: its 1-based position in the file and the error that
/// rejected it.
#[derive(Debug)]
pub struct RowFailure {
    pub row: usize,
    pub error: String,
}
