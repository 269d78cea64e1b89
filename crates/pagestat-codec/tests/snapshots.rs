//! End-to-end decoding of scraped rows into page snapshots.

use pagestat_codec::{CodecError, Converter, decode_snapshots, row_to_snapshot};
use pagestat_model::FlatRow;

const HEADER: &str = "Path,Scraped At,Page,Global Rank,Country Rank,Category Rank,\
Total Visits,Bounce Rate,Pages per Visit,Avg Visit Duration,\
Monthly Traffic P1,Monthly Traffic P2,Monthly Traffic P3,\
Top Countries (1),Top Countries (2),Top Countries (3),Top Countries (4),Top Countries (5),\
Demographics (18 - 24),Demographics (25 - 34),Demographics (35 - 44),\
Demographics (45 - 54),Demographics (55 - 64),Demographics (65+)";

const GOOGLE_ROW: &str = "google-com,2023-03-15T12:49:28.850051,google.com,#1,#1,#1,\
86.4B,28.77%,8.29,00:10:35,\
Oct:87.0B,Nov:85.6B,Dec:86.4B,\
United States:27.04%,India:4.59%,Brazil:4.39%,United Kingdom:3.94%,Japan:3.70%,\
23.86%,29.26%,18.88%,12.87%,8.91%,6.22%";

const SPARSE_ROW: &str = "byte-trading-com,2023-03-15T12:50:01.000000,byte-trading.com,\
\"#7,277,9362,350,824\",,,< 5K,,,,,,,,,,,,,,,,,";

fn decode_one(row: &str) -> pagestat_model::PageSnapshot {
    let data = format!("{HEADER}\n{row}\n");
    let converter = Converter::default();
    let mut results = decode_snapshots(&converter, data.as_bytes(), true).unwrap();
    assert_eq!(results.len(), 1);
    results.remove(0).unwrap()
}

#[test]
fn test_full_row_structures_every_group_family() {
    let snapshot = decode_one(GOOGLE_ROW);
    assert_eq!(snapshot.page, "google.com");
    assert_eq!(snapshot.global_rank, 1);
    assert_eq!(snapshot.total_visits, 86_400_000_000);
    assert_eq!(snapshot.bounce_rate, 28.77);
    assert_eq!(snapshot.pages_per_visit, 8.29);
    assert_eq!(snapshot.avg_visit_duration, 635);

    assert_eq!(snapshot.monthly_traffic.len(), 3);
    assert_eq!(snapshot.monthly_traffic[0].month, 10);
    assert_eq!(snapshot.monthly_traffic[0].year, 2023);
    assert_eq!(snapshot.monthly_traffic[2].visits, 86_400_000_000);

    assert_eq!(snapshot.top_countries.len(), 5);
    assert_eq!(snapshot.top_countries[0].country, "United States");
    assert_eq!(snapshot.top_countries[0].share_pct, 27.04);
    assert_eq!(snapshot.top_countries[4].rank, 5);

    assert_eq!(snapshot.demographics.len(), 6);
    assert_eq!(snapshot.demographics[0].age_range, "18 - 24");
    assert_eq!(snapshot.demographics[5].age_range, "65+");
    assert_eq!(snapshot.demographics[5].share_pct, 6.22);
}

#[test]
fn test_sparse_row_defaults_scalars_and_empties_groups() {
    let snapshot = decode_one(SPARSE_ROW);
    // Concatenation artifact in the source rank is kept verbatim.
    assert_eq!(snapshot.global_rank, 72_779_362_350_824);
    assert_eq!(snapshot.country_rank, 0);
    assert_eq!(snapshot.category_rank, 0);
    // The "< 5K" floor sentinel.
    assert_eq!(snapshot.total_visits, 0);
    assert_eq!(snapshot.bounce_rate, 0.0);
    assert_eq!(snapshot.pages_per_visit, 0.0);
    assert_eq!(snapshot.avg_visit_duration, 0);
    assert!(snapshot.monthly_traffic.is_empty());
    assert!(snapshot.top_countries.is_empty());
    assert!(snapshot.demographics.is_empty());
}

#[test]
fn test_group_order_follows_row_column_order() {
    let snapshot = decode_one(GOOGLE_ROW);
    let periods: Vec<u32> = snapshot.monthly_traffic.iter().map(|t| t.period).collect();
    assert_eq!(periods, vec![1, 2, 3]);
    let ranks: Vec<u32> = snapshot.top_countries.iter().map(|c| c.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_header_check_rejects_incomplete_rows() {
    let row: FlatRow = [("Page", "google.com"), ("Scraped At", "2023-03-15T12:49:28")]
        .into_iter()
        .collect();
    let error = row_to_snapshot(&Converter::default(), &row, true).unwrap_err();
    assert!(matches!(error, CodecError::SchemaMismatch { .. }));
}

#[test]
fn test_without_header_check_missing_scalars_default() {
    let row: FlatRow = [
        ("Scraped At", "2023-03-15T12:49:28"),
        ("Page", "google.com"),
    ]
    .into_iter()
    .collect();
    let snapshot = row_to_snapshot(&Converter::default(), &row, false).unwrap();
    assert_eq!(snapshot.page, "google.com");
    assert_eq!(snapshot.global_rank, 0);
    assert_eq!(snapshot.total_visits, 0);
}

#[test]
fn test_failed_row_does_not_poison_the_batch() {
    let data = format!("{HEADER}\n{SPARSE_ROW}\n{GOOGLE_ROW}\n");
    let converter = Converter::default();
    let mut bad = decode_snapshots(&converter, data.as_bytes(), true).unwrap();
    assert_eq!(bad.len(), 2);
    assert!(bad[0].is_ok());
    assert!(bad[1].is_ok());

    let broken = GOOGLE_ROW.replace("#1,#1,#1", "755500,#1,#1");
    let data = format!("{HEADER}\n{broken}\n{GOOGLE_ROW}\n");
    let results = decode_snapshots(&converter, data.as_bytes(), true).unwrap();
    assert!(results[0].is_err());
    assert!(results[1].is_ok());
}
