//! Test fixtures: raw records and a realistic source page.

use chrono::NaiveDate;
use stats_core::{DailyRecord, RawTotals};

/// Raw daily records covering the interesting derivation cases: a
/// backward test-count correction on day 3 and a zero-rapid day.
pub fn sample_daily_records() -> Vec<DailyRecord> {
    vec![
        daily_record(1, 10, 1, 100, 0),
        daily_record(2, 20, 2, 150, 40),
        daily_record(3, 15, 1, 120, 90),
        daily_record(4, 30, 3, 200, 150),
    ]
}

pub fn daily_record(day: u32, cases: i64, deceased: i64, tests: i64, rapid: i64) -> DailyRecord {
    DailyRecord {
        date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
        cases,
        deceased,
        intubated: cases / 5,
        total_cases: 0,
        total_deceased: 0,
        total_tests: tests,
        total_rapid_tests: rapid,
    }
}

pub fn sample_totals() -> RawTotals {
    let mut totals = RawTotals::new();
    for (key, value) in [
        ("id", 1),
        ("cases_0_17_male", 120),
        ("cases_0_17_female", 110),
        ("cases_18_39_male", 1500),
        ("cases_18_39_female", 1400),
        ("deceased_65plus_male", 350),
        ("deceased_65plus_female", 310),
        ("intubated_male", 42),
        ("intubated_female", 30),
    ] {
        totals.insert(key.to_string(), serde_json::json!(value));
    }
    totals
}

/// A source page shaped like the real one: two unrelated script tags
/// followed by the data-bearing one at index 2.
pub fn sample_page() -> String {
    let records = serde_json::to_string(&sample_daily_records()).unwrap();
    let aggregates = serde_json::to_string(&[daily_record(4, 75, 7, 570, 280)]).unwrap();
    let totals = serde_json::to_string(&sample_totals()).unwrap();

    format!(
        "<!DOCTYPE html><html><head>\
         <script src=\"/assets/charts.js\"></script>\
         <script>window._paq = window._paq || [];</script>\
         <script type=\"text/javascript\">\n\
         var daily_stats = {records};\n\
         var weekly_stats = {aggregates};\n\
         var three_days_stats = {aggregates};\n\
         var total_stats = {totals};\n\
         </script>\
         </head><body><div id=\"app\"></div></body></html>"
    )
}
