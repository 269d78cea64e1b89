//! The grouping structurer: one alias-rekeyed flat row in, one fully typed
//! page snapshot out.
//!
//! Repeated groups arrive as families of indexed columns. Classification is
//! a single exhaustive step over a closed set of families; each family owns
//! the parser that splits its key token and payload and yields exactly one
//! sub-record.

use chrono::{Datelike, Month, NaiveDateTime};

use pagestat_model::{
    AgeBracket, CountryShare, FlatRow, MonthlyTraffic, PageSnapshot, RecordSchema,
};

use crate::coerce::{self, CoerceError};
use crate::error::{CodecError, Result};

const TRAFFIC_PREFIX: &str = "Monthly Traffic";
const COUNTRIES_PREFIX: &str = "Top Countries";
const DEMOGRAPHICS_PREFIX: &str = "Demographics";

/// The closed set of repeated-group column families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupFamily {
    /// `Monthly Traffic P<n>` with a `Month:visits` payload.
    Traffic,
    /// `Top Countries (<n>)` with a `Country:share%` payload.
    Countries,
    /// `Demographics (<bracket>)` with a bare percentage payload; the
    /// bracket label is data, not an index.
    Demographics,
}

impl GroupFamily {
    /// Classifies a column name into its family, or `None` for columns that
    /// belong to no repeated group (scalar identifiers and arbitrary extras).
    pub fn classify(key: &str) -> Option<Self> {
        if key.starts_with(TRAFFIC_PREFIX) {
            Some(GroupFamily::Traffic)
        } else if key.starts_with(COUNTRIES_PREFIX) {
            Some(GroupFamily::Countries)
        } else if key.starts_with(DEMOGRAPHICS_PREFIX) {
            Some(GroupFamily::Demographics)
        } else {
            None
        }
    }
}

/// Coercion function for one scalar kind.
pub type CoerceFn<T> = fn(&str) -> std::result::Result<T, CoerceError>;

/// Structuring function for one column of the traffic family. The year is
/// passed in because the payload only carries a month name; it is derived
/// from the row's own scrape timestamp so structuring stays idempotent.
/// The visits coercer comes from the bundle so a swapped magnitude parser
/// reaches group payloads too.
pub type TrafficFn =
    fn(key: &str, value: &str, year: i32, magnitude: CoerceFn<u64>) -> Result<MonthlyTraffic>;

/// Structuring function for one column of the countries family.
pub type CountryFn =
    fn(key: &str, value: &str, percentage: CoerceFn<f64>) -> Result<CountryShare>;

/// Structuring function for one column of the demographics family.
pub type DemographicFn =
    fn(key: &str, value: &str, percentage: CoerceFn<f64>) -> Result<AgeBracket>;

/// Explicit bundle of one coercer per scalar kind and one structuring
/// function per group family.
///
/// The bundle is passed to the codec rather than registered in ambient
/// global state, so a caller with deviant source data can swap individual
/// parsers without touching the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    pub magnitude: CoerceFn<u64>,
    pub float: CoerceFn<f64>,
    pub percentage: CoerceFn<f64>,
    pub rank: CoerceFn<u64>,
    pub duration: CoerceFn<u32>,
    pub timestamp: CoerceFn<NaiveDateTime>,
    pub traffic: TrafficFn,
    pub country: CountryFn,
    pub demographic: DemographicFn,
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            magnitude: coerce::parse_magnitude,
            float: coerce::parse_float,
            percentage: coerce::parse_percentage,
            rank: coerce::parse_rank,
            duration: coerce::parse_duration_seconds,
            timestamp: coerce::parse_timestamp,
            traffic: traffic_entry,
            country: country_entry,
            demographic: demographic_entry,
        }
    }
}

impl Converter {
    /// Structures one identifier-keyed flat row into a snapshot.
    ///
    /// Single linear pass: reject non-text cells, coerce the scalar fields,
    /// then classify the remaining columns into group families in row key
    /// order. Empty-valued group columns contribute no sub-record. Any
    /// failure aborts the whole record.
    pub fn structure_row(&self, row: &FlatRow) -> Result<PageSnapshot> {
        // Type invariant first: no coercion may run against non-text cells.
        for (key, cell) in row.iter() {
            if cell.as_text().is_none() {
                return Err(CodecError::NonText {
                    key: key.to_string(),
                    kind: cell.kind(),
                });
            }
        }
        let text = |ident: &str| row.text(ident).unwrap_or("");

        let scraped_at = (self.timestamp)(text("scraped_at"))
            .map_err(|e| CodecError::coercion("scraped_at", e))?;
        let year = scraped_at.year();

        let mut monthly_traffic = Vec::new();
        let mut top_countries = Vec::new();
        let mut demographics = Vec::new();
        for (key, cell) in row.iter() {
            let value = cell.as_text().unwrap_or("");
            // An empty group column contributes no sub-record at all, not a
            // zero-valued one.
            if value.is_empty() {
                continue;
            }
            match GroupFamily::classify(key) {
                Some(GroupFamily::Traffic) => {
                    monthly_traffic.push((self.traffic)(key, value, year, self.magnitude)?);
                }
                Some(GroupFamily::Countries) => {
                    top_countries.push((self.country)(key, value, self.percentage)?);
                }
                Some(GroupFamily::Demographics) => {
                    demographics.push((self.demographic)(key, value, self.percentage)?);
                }
                None => {}
            }
        }

        Ok(PageSnapshot {
            path: text("path").to_string(),
            scraped_at,
            page: text("page").to_string(),
            global_rank: (self.rank)(text("global_rank"))
                .map_err(|e| CodecError::coercion("global_rank", e))?,
            country_rank: (self.rank)(text("country_rank"))
                .map_err(|e| CodecError::coercion("country_rank", e))?,
            category_rank: (self.rank)(text("category_rank"))
                .map_err(|e| CodecError::coercion("category_rank", e))?,
            // The magnitude grammar itself has no empty case; the blank or
            // missing cell still takes the scalar default here.
            total_visits: match text("total_visits") {
                "" => 0,
                raw => {
                    (self.magnitude)(raw).map_err(|e| CodecError::coercion("total_visits", e))?
                }
            },
            bounce_rate: (self.percentage)(text("bounce_rate"))
                .map_err(|e| CodecError::coercion("bounce_rate", e))?,
            pages_per_visit: (self.float)(text("pages_per_visit"))
                .map_err(|e| CodecError::coercion("pages_per_visit", e))?,
            avg_visit_duration: (self.duration)(text("avg_visit_duration"))
                .map_err(|e| CodecError::coercion("avg_visit_duration", e))?,
            monthly_traffic,
            top_countries,
            demographics,
        })
    }
}

fn pattern(key: &str, value: &str, reason: impl Into<String>) -> CodecError {
    CodecError::Pattern {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Text between the first `(` and the last `)` of a column name.
fn bracketed(key: &str) -> Option<&str> {
    let start = key.find('(')? + 1;
    let end = key.rfind(')')?;
    (start <= end).then(|| &key[start..end])
}

/// Structures one `Monthly Traffic P<n>` column. The payload is
/// `Month:visits`, e.g. `"Oct:87.0B"`.
pub fn traffic_entry(
    key: &str,
    value: &str,
    year: i32,
    magnitude: CoerceFn<u64>,
) -> Result<MonthlyTraffic> {
    let period: u32 = key
        .strip_prefix(TRAFFIC_PREFIX)
        .and_then(|rest| rest.trim().strip_prefix('P'))
        .and_then(|index| index.parse().ok())
        .ok_or_else(|| pattern(key, value, "expected a period index after 'Monthly Traffic P'"))?;
    let (month_name, raw_visits) = value
        .split_once(':')
        .ok_or_else(|| pattern(key, value, "expected a 'Month:visits' payload"))?;
    let month = month_name
        .parse::<Month>()
        .map_err(|_| pattern(key, value, format!("unknown month name {month_name:?}")))?
        .number_from_month();
    let visits = magnitude(raw_visits).map_err(|e| CodecError::group_coercion(key, value, e))?;
    Ok(MonthlyTraffic {
        period,
        month,
        year,
        visits,
    })
}

/// Structures one `Top Countries (<n>)` column. The payload is
/// `Country:share`, e.g. `"United States:27.04%"`.
pub fn country_entry(key: &str, value: &str, percentage: CoerceFn<f64>) -> Result<CountryShare> {
    let rank: u32 = bracketed(key)
        .and_then(|token| token.replace(',', "").trim().parse().ok())
        .ok_or_else(|| pattern(key, value, "expected a bracketed rank in the column name"))?;
    let (country, raw_share) = value
        .split_once(':')
        .ok_or_else(|| pattern(key, value, "expected a 'Country:share' payload"))?;
    let share_pct =
        percentage(raw_share).map_err(|e| CodecError::group_coercion(key, value, e))?;
    Ok(CountryShare {
        rank,
        country: country.to_string(),
        share_pct,
    })
}

/// Structures one `Demographics (<bracket>)` column. The bracketed key text
/// is the age range itself; the payload is a bare percentage.
pub fn demographic_entry(key: &str, value: &str, percentage: CoerceFn<f64>) -> Result<AgeBracket> {
    let age_range = bracketed(key)
        .ok_or_else(|| pattern(key, value, "expected a bracketed age range in the column name"))?;
    let share_pct = percentage(value).map_err(|e| CodecError::group_coercion(key, value, e))?;
    Ok(AgeBracket {
        age_range: age_range.to_string(),
        share_pct,
    })
}

/// Rekeys an external row to identifiers and structures it.
///
/// Convenience for callers holding rows straight from the decoder or the
/// scraper; [`Converter::structure_row`] itself expects identifier keys.
pub fn structure_external_row(converter: &Converter, row: &FlatRow) -> Result<PageSnapshot> {
    converter.structure_row(&PageSnapshot::alias_map().rekey(row))
}
