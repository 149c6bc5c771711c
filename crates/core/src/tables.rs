//! Table row types for the four stats tables.
//!
//! All four tables are rebuilt from scratch on every refresh and published
//! wholesale as a [`Snapshot`]; readers hold immutable handles and never
//! mutate rows in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The `total_stats` object literal as fetched: breakdown key → JSON value.
pub type RawTotals = serde_json::Map<String, serde_json::Value>;

/// One raw per-day row as reported by the source.
///
/// Unknown upstream fields are ignored; a missing or mistyped known field
/// fails the whole blob decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub cases: i64,
    pub deceased: i64,
    pub intubated: i64,
    pub total_cases: i64,
    pub total_deceased: i64,
    pub total_tests: i64,
    pub total_rapid_tests: i64,
}

/// One derived per-day row: the raw columns plus calculated metrics.
///
/// The rate columns may hold non-finite values where a denominator is
/// zero; they are carried through persistence as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub cases: i64,
    pub deceased: i64,
    pub intubated: i64,
    pub total_cases: i64,
    pub total_deceased: i64,
    pub total_tests: i64,
    pub total_rapid_tests: i64,
    pub calculated_cases_cumsum: i64,
    pub calculated_deceased_cumsum: i64,
    pub calculated_tests_pcr: i64,
    pub calculated_tests_rapid: i64,
    pub calculated_tests_total: i64,
    pub calculated_positivity: f64,
    pub calculated_fatality: f64,
}

/// One all-time breakdown row decomposed from a `category_age_gender` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalRow {
    pub category: String,
    /// Age-band token, empty for aggregate rows.
    pub age: String,
    pub gender: String,
    pub value: i64,
}

/// The four raw tables exactly as extracted from the source page.
#[derive(Debug, Clone)]
pub struct RawBundle {
    pub daily: Vec<DailyRecord>,
    pub three_day: Vec<DailyRecord>,
    pub weekly: Vec<DailyRecord>,
    pub total: RawTotals,
}

/// The four derived tables, published together as process-wide state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub daily: Vec<DailyRow>,
    pub three_day: Vec<DailyRecord>,
    pub weekly: Vec<DailyRecord>,
    pub total: Vec<TotalRow>,
}

impl Snapshot {
    /// No table holds any rows. The state a process starts with before
    /// the first successful refresh.
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
            && self.three_day.is_empty()
            && self.weekly.is_empty()
            && self.total.is_empty()
    }

    /// Latest daily row (rows are in date order, latest last).
    pub fn latest_daily(&self) -> Option<&DailyRow> {
        self.daily.last()
    }

    /// All breakdown rows for a category.
    pub fn totals_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a TotalRow> {
        self.total.iter().filter(move |row| row.category == category)
    }

    /// Value for an exact `(category, age, gender)` breakdown key.
    pub fn total_value(&self, category: &str, age: &str, gender: &str) -> Option<i64> {
        self.total
            .iter()
            .find(|row| row.category == category && row.age == age && row.gender == gender)
            .map(|row| row.value)
    }
}
