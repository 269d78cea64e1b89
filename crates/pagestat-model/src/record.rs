//! The three record layers: the raw scraped row, the structured page
//! snapshot, and the repeated-group sub-records.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::alias::{AliasMap, Field};
use crate::error::ModelError;
use crate::row::FlatRow;
use crate::schema::{FlatRecord, RecordSchema, text_field};

/// One raw scraped page, exactly as the scraper emits it: every data point a
/// text cell, repeated groups still flattened into indexed columns. This is
/// the shape that round-trips through the tabular codec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRow {
    pub path: String,
    pub scraped_at: String,
    pub page: String,
    pub global_rank: String,
    pub country_rank: String,
    pub category_rank: String,
    pub total_visits: String,
    pub bounce_rate: String,
    pub pages_per_visit: String,
    pub avg_visit_duration: String,
    pub monthly_traffic_p1: String,
    pub monthly_traffic_p2: String,
    pub monthly_traffic_p3: String,
    pub top_country_r1: String,
    pub top_country_r2: String,
    pub top_country_r3: String,
    pub top_country_r4: String,
    pub top_country_r5: String,
    pub demographics_t1: String,
    pub demographics_t2: String,
    pub demographics_t3: String,
    pub demographics_t4: String,
    pub demographics_t5: String,
    pub demographics_t6: String,
}

static PAGE_ROW_FIELDS: &[Field] = &[
    Field::aliased("path", "Path"),
    Field::aliased("scraped_at", "Scraped At"),
    Field::aliased("page", "Page"),
    Field::aliased("global_rank", "Global Rank"),
    Field::aliased("country_rank", "Country Rank"),
    Field::aliased("category_rank", "Category Rank"),
    Field::aliased("total_visits", "Total Visits"),
    Field::aliased("bounce_rate", "Bounce Rate"),
    Field::aliased("pages_per_visit", "Pages per Visit"),
    Field::aliased("avg_visit_duration", "Avg Visit Duration"),
    Field::aliased("monthly_traffic_p1", "Monthly Traffic P1"),
    Field::aliased("monthly_traffic_p2", "Monthly Traffic P2"),
    Field::aliased("monthly_traffic_p3", "Monthly Traffic P3"),
    Field::aliased("top_country_r1", "Top Countries (1)"),
    Field::aliased("top_country_r2", "Top Countries (2)"),
    Field::aliased("top_country_r3", "Top Countries (3)"),
    Field::aliased("top_country_r4", "Top Countries (4)"),
    Field::aliased("top_country_r5", "Top Countries (5)"),
    Field::aliased("demographics_t1", "Demographics (18 - 24)"),
    Field::aliased("demographics_t2", "Demographics (25 - 34)"),
    Field::aliased("demographics_t3", "Demographics (35 - 44)"),
    Field::aliased("demographics_t4", "Demographics (45 - 54)"),
    Field::aliased("demographics_t5", "Demographics (55 - 64)"),
    Field::aliased("demographics_t6", "Demographics (65+)"),
];

static PAGE_ROW_ALIASES: LazyLock<AliasMap> = LazyLock::new(|| {
    AliasMap::new(PageRow::NAME, PAGE_ROW_FIELDS).expect("PageRow field table is bijective")
});

impl RecordSchema for PageRow {
    const NAME: &'static str = "PageRow";

    fn alias_map() -> &'static AliasMap {
        &PAGE_ROW_ALIASES
    }
}

impl FlatRecord for PageRow {
    fn from_row(row: &FlatRow) -> Result<Self, ModelError> {
        Ok(Self {
            path: text_field(row, "path")?,
            scraped_at: text_field(row, "scraped_at")?,
            page: text_field(row, "page")?,
            global_rank: text_field(row, "global_rank")?,
            country_rank: text_field(row, "country_rank")?,
            category_rank: text_field(row, "category_rank")?,
            total_visits: text_field(row, "total_visits")?,
            bounce_rate: text_field(row, "bounce_rate")?,
            pages_per_visit: text_field(row, "pages_per_visit")?,
            avg_visit_duration: text_field(row, "avg_visit_duration")?,
            monthly_traffic_p1: text_field(row, "monthly_traffic_p1")?,
            monthly_traffic_p2: text_field(row, "monthly_traffic_p2")?,
            monthly_traffic_p3: text_field(row, "monthly_traffic_p3")?,
            top_country_r1: text_field(row, "top_country_r1")?,
            top_country_r2: text_field(row, "top_country_r2")?,
            top_country_r3: text_field(row, "top_country_r3")?,
            top_country_r4: text_field(row, "top_country_r4")?,
            top_country_r5: text_field(row, "top_country_r5")?,
            demographics_t1: text_field(row, "demographics_t1")?,
            demographics_t2: text_field(row, "demographics_t2")?,
            demographics_t3: text_field(row, "demographics_t3")?,
            demographics_t4: text_field(row, "demographics_t4")?,
            demographics_t5: text_field(row, "demographics_t5")?,
            demographics_t6: text_field(row, "demographics_t6")?,
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.path.clone(),
            self.scraped_at.clone(),
            self.page.clone(),
            self.global_rank.clone(),
            self.country_rank.clone(),
            self.category_rank.clone(),
            self.total_visits.clone(),
            self.bounce_rate.clone(),
            self.pages_per_visit.clone(),
            self.avg_visit_duration.clone(),
            self.monthly_traffic_p1.clone(),
            self.monthly_traffic_p2.clone(),
            self.monthly_traffic_p3.clone(),
            self.top_country_r1.clone(),
            self.top_country_r2.clone(),
            self.top_country_r3.clone(),
            self.top_country_r4.clone(),
            self.top_country_r5.clone(),
            self.demographics_t1.clone(),
            self.demographics_t2.clone(),
            self.demographics_t3.clone(),
            self.demographics_t4.clone(),
            self.demographics_t5.clone(),
            self.demographics_t6.clone(),
        ]
    }
}

/// One monthly traffic data point from the traffic chart. `period` is the
/// 1-based chart position the column carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTraffic {
    pub period: u32,
    pub month: u32,
    pub year: i32,
    pub visits: u64,
}

/// One entry of the top-countries distribution. `share_pct` stays in
/// percentage units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryShare {
    pub rank: u32,
    pub country: String,
    pub share_pct: f64,
}

/// One age bracket of the demographics chart. The bracket label is data
/// carried by the column name, not an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBracket {
    pub age_range: String,
    pub share_pct: f64,
}

/// The fully typed, nested result of structuring one flat row: scalars
/// coerced, repeated groups resolved into ordered sub-record lists.
///
/// Built in one pass and never mutated afterwards; identity, deduplication,
/// and storage belong to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub path: String,
    pub scraped_at: NaiveDateTime,
    pub page: String,
    pub global_rank: u64,
    pub country_rank: u64,
    pub category_rank: u64,
    pub total_visits: u64,
    pub bounce_rate: f64,
    pub pages_per_visit: f64,
    pub avg_visit_duration: u32,
    pub monthly_traffic: Vec<MonthlyTraffic>,
    pub top_countries: Vec<CountryShare>,
    pub demographics: Vec<AgeBracket>,
}

// Scalar fields only. Repeated-group columns are classified by pattern in
// the structurer and so carry no alias entries.
static PAGE_SNAPSHOT_FIELDS: &[Field] = &[
    Field::aliased("path", "Path"),
    Field::aliased("scraped_at", "Scraped At"),
    Field::aliased("page", "Page"),
    Field::aliased("global_rank", "Global Rank"),
    Field::aliased("country_rank", "Country Rank"),
    Field::aliased("category_rank", "Category Rank"),
    Field::aliased("total_visits", "Total Visits"),
    Field::aliased("bounce_rate", "Bounce Rate"),
    Field::aliased("pages_per_visit", "Pages per Visit"),
    Field::aliased("avg_visit_duration", "Avg Visit Duration"),
];

static PAGE_SNAPSHOT_ALIASES: LazyLock<AliasMap> = LazyLock::new(|| {
    AliasMap::new(PageSnapshot::NAME, PAGE_SNAPSHOT_FIELDS)
        .expect("PageSnapshot field table is bijective")
});

impl RecordSchema for PageSnapshot {
    const NAME: &'static str = "PageSnapshot";

    fn alias_map() -> &'static AliasMap {
        &PAGE_SNAPSHOT_ALIASES
    }
}
