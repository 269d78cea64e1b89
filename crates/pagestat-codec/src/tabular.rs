//! Tabular codec: CSV-shaped byte buffers to flat rows and back, plus the
//! row-to-typed conversion with optional header validation.
//!
//! Decoding never coerces; rows come out keyed by header text as-is. Both
//! directions operate on whole buffers, since inputs are bounded tabular
//! files rather than unbounded streams.

use std::collections::BTreeSet;

use csv::{ReaderBuilder, WriterBuilder};

use pagestat_model::{FlatRecord, FlatRow, PageSnapshot, RecordSchema};

use crate::error::{CodecError, Result};
use crate::structure::{Converter, structure_external_row};

/// Decodes a UTF-8, comma-separated byte buffer into ordered flat rows.
/// The first line is the header; each later line becomes one row keyed by
/// header text.
pub fn decode_rows(data: &[u8]) -> Result<Vec<FlatRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = FlatRow::with_capacity(headers.len());
        for (idx, name) in headers.iter().enumerate() {
            row.push(name, record.get(idx).unwrap_or(""));
        }
        rows.push(row);
    }
    tracing::debug!(
        rows = rows.len(),
        columns = headers.len(),
        "decoded tabular input"
    );
    Ok(rows)
}

/// Encodes records of a schema fully resolvable by its alias map: a header
/// line of alias values in field-declaration order, then one line per
/// record.
pub fn encode_records<T: FlatRecord>(records: &[T]) -> Result<Vec<u8>> {
    let map = T::alias_map();
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(map.columns())?;
    for record in records {
        writer.write_record(record.cells())?;
    }
    writer
        .into_inner()
        .map_err(|e| CodecError::Csv(csv::Error::from(e.into_error())))
}

/// Validates that the row's column-name set is a superset of the schema's
/// expected aliases. On mismatch the error names both the missing and the
/// unexpected columns.
pub fn check_row_headers<S: RecordSchema>(row: &FlatRow) -> Result<()> {
    let expected: BTreeSet<&str> = S::alias_map().columns().collect();
    let actual: BTreeSet<&str> = row.keys().collect();
    let missing: Vec<String> = expected
        .difference(&actual)
        .map(|name| (*name).to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    let extra: Vec<String> = actual
        .difference(&expected)
        .map(|name| (*name).to_string())
        .collect();
    Err(CodecError::SchemaMismatch {
        schema: S::NAME,
        missing,
        extra,
    })
}

/// Decodes a byte buffer straight into typed flat records, rekeying each
/// row from aliases to identifiers. Fails fast on the first bad row; use
/// [`decode_rows`] plus [`FlatRecord::from_row`] for per-row control.
pub fn decode_records<T: FlatRecord>(data: &[u8], check_headers: bool) -> Result<Vec<T>> {
    let map = T::alias_map();
    decode_rows(data)?
        .iter()
        .map(|row| {
            if check_headers {
                check_row_headers::<T>(row)?;
            }
            Ok(T::from_row(&map.rekey(row))?)
        })
        .collect()
}

/// Converts one external-keyed flat row into a snapshot: optional header
/// validation, alias rekeying, then structuring. With the check disabled the
/// row still rekeys, and structuring tolerates arbitrary extra or missing
/// keys.
pub fn row_to_snapshot(
    converter: &Converter,
    row: &FlatRow,
    check_headers: bool,
) -> Result<PageSnapshot> {
    if check_headers {
        check_row_headers::<PageSnapshot>(row)?;
    }
    structure_external_row(converter, row)
}

/// Decodes a byte buffer into per-row snapshot results.
///
/// The outer error covers a malformed byte stream only. A failed row aborts
/// that row alone; whether the batch continues is the caller's policy, so
/// each row's outcome is returned separately.
pub fn decode_snapshots(
    converter: &Converter,
    data: &[u8],
    check_headers: bool,
) -> Result<Vec<Result<PageSnapshot>>> {
    let rows = decode_rows(data)?;
    Ok(rows
        .iter()
        .map(|row| row_to_snapshot(converter, row, check_headers))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagestat_model::PageRow;

    #[test]
    fn test_decode_rows_keys_by_header_text_as_is() {
        let data = b"Page, Global Rank \ngoogle.com,#1\n";
        let rows = decode_rows(data).unwrap();
        assert_eq!(rows.len(), 1);
        // No trimming or normalization of header text.
        let keys: Vec<&str> = rows[0].keys().collect();
        assert_eq!(keys, vec!["Page", " Global Rank "]);
    }

    #[test]
    fn test_decode_rows_handles_quoting() {
        let data = b"Page,Top Countries (1)\nexample.com,\"United States:27.04%\"\n";
        let rows = decode_rows(data).unwrap();
        assert_eq!(
            rows[0].text("Top Countries (1)"),
            Some("United States:27.04%")
        );
    }

    #[test]
    fn test_decode_rows_never_coerces() {
        let data = b"Global Rank\n#1\n";
        let rows = decode_rows(data).unwrap();
        assert_eq!(rows[0].text("Global Rank"), Some("#1"));
    }

    #[test]
    fn test_encode_header_follows_declaration_order() {
        let bytes = encode_records::<PageRow>(&[]).unwrap();
        let header = String::from_utf8(bytes).unwrap();
        assert!(header.starts_with("Path,Scraped At,Page,Global Rank"));
        assert!(header.trim_end().ends_with("Demographics (65+)"));
    }

    #[test]
    fn test_header_check_reports_missing_and_extra() {
        let mut row = FlatRow::new();
        for column in PageSnapshot::alias_map().columns() {
            if column == "Bounce Rate" {
                continue;
            }
            row.push(column, "");
        }
        row.push("Bounce Ratio", "");
        let error = check_row_headers::<PageSnapshot>(&row).unwrap_err();
        match error {
            CodecError::SchemaMismatch { missing, extra, .. } => {
                assert_eq!(missing, vec!["Bounce Rate".to_string()]);
                assert_eq!(extra, vec!["Bounce Ratio".to_string()]);
            }
            other => panic!("expected a schema mismatch, got {other}"),
        }
    }

    #[test]
    fn test_header_check_allows_extra_columns_when_complete() {
        let mut row = FlatRow::new();
        for column in PageSnapshot::alias_map().columns() {
            row.push(column, "");
        }
        row.push("Monthly Traffic P1", "Oct:87.0B");
        assert!(check_row_headers::<PageSnapshot>(&row).is_ok());
    }
}
