//! Data model for scraped page statistics: flat rows as the scraper and CSV
//! reader hand them over, alias maps decoupling wire column names from field
//! identifiers, and the typed record schemas the codec produces.

pub mod alias;
pub mod error;
pub mod record;
pub mod row;
pub mod schema;

pub use alias::{AliasMap, Field};
pub use error::{ModelError, Result};
pub use record::{AgeBracket, CountryShare, MonthlyTraffic, PageRow, PageSnapshot};
pub use row::{CellValue, FlatRow};
pub use schema::{FlatRecord, RecordSchema};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_schema_exposes_scalar_columns_only() {
        let map = PageSnapshot::alias_map();
        assert_eq!(map.len(), 10);
        assert!(map.ident_of("Monthly Traffic P1").is_none());
        assert_eq!(map.ident_of("Avg Visit Duration"), Some("avg_visit_duration"));
    }

    #[test]
    fn test_page_row_and_snapshot_share_scalar_columns() {
        let row_map = PageRow::alias_map();
        for column in PageSnapshot::alias_map().columns() {
            assert_eq!(
                row_map.column_of(row_map.ident_of(column).unwrap()),
                Some(column)
            );
        }
    }
}
