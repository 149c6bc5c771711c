//! Metric derivation for the four stats tables.
//!
//! Pure functions: each takes a raw table and returns the derived table.
//! Persistence is the orchestrator's job.

use serde_json::Value;
use tracing::warn;

use crate::breakdown::Breakdown;
use crate::error::{Error, Result};
use crate::tables::{DailyRecord, DailyRow, RawTotals, TotalRow};

/// Source-side housekeeping keys carried in the `total_stats` object that
/// are not breakdown entries.
const HOUSEKEEPING_KEYS: [&str; 4] = ["id", "date", "created_at", "updated_at"];

/// Derive the daily table.
///
/// Rows are taken in source order, which the upstream reports in date
/// order. Cumulative sums run over `cases` and `deceased`; the per-day
/// test counts are corrected day-over-day deltas of the reported running
/// totals; positivity and fatality are percentage ratios that go
/// non-finite on a zero denominator rather than being guarded.
pub fn transform_daily(records: &[DailyRecord]) -> Vec<DailyRow> {
    let pcr_totals: Vec<i64> = records.iter().map(|r| r.total_tests).collect();
    let rapid_totals: Vec<i64> = records.iter().map(|r| r.total_rapid_tests).collect();
    let tests_pcr = corrected_daily_deltas(&pcr_totals);
    let tests_rapid = corrected_daily_deltas(&rapid_totals);

    let mut cases_cumsum = 0i64;
    let mut deceased_cumsum = 0i64;

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            cases_cumsum += record.cases;
            deceased_cumsum += record.deceased;
            let tests_total = tests_pcr[i] + tests_rapid[i];

            DailyRow {
                date: record.date,
                cases: record.cases,
                deceased: record.deceased,
                intubated: record.intubated,
                total_cases: record.total_cases,
                total_deceased: record.total_deceased,
                total_tests: record.total_tests,
                total_rapid_tests: record.total_rapid_tests,
                calculated_cases_cumsum: cases_cumsum,
                calculated_deceased_cumsum: deceased_cumsum,
                calculated_tests_pcr: tests_pcr[i],
                calculated_tests_rapid: tests_rapid[i],
                calculated_tests_total: tests_total,
                calculated_positivity: record.cases as f64 / tests_total as f64 * 100.0,
                calculated_fatality: deceased_cumsum as f64 / cases_cumsum as f64 * 100.0,
            }
        })
        .collect()
}

/// Day-over-day deltas of a running total.
///
/// The first row has no prior day; its delta is the raw total itself.
/// A negative delta is an upstream backward correction, not a real daily
/// count: it is replaced by the most recent non-negative delta. A run of
/// consecutive negatives therefore repeats one stale value — the known
/// behavior of the original forward fill, preserved on purpose.
fn corrected_daily_deltas(totals: &[i64]) -> Vec<i64> {
    let mut deltas = Vec::with_capacity(totals.len());
    let mut last_valid = 0i64;

    for (i, &total) in totals.iter().enumerate() {
        let delta = if i == 0 { total } else { total - totals[i - 1] };
        if delta < 0 {
            deltas.push(last_valid);
        } else {
            last_valid = delta;
            deltas.push(delta);
        }
    }

    deltas
}

/// Derive the all-time breakdown table from the flat key→value object.
///
/// Housekeeping keys are dropped; the remainder decompose positionally
/// via [`Breakdown::parse`]. Keys that do not decompose fully are logged
/// and kept. Values may arrive as JSON numbers or numeric strings.
pub fn transform_total(raw: &RawTotals) -> Result<Vec<TotalRow>> {
    let mut rows = Vec::with_capacity(raw.len());

    for (key, value) in raw {
        if HOUSEKEEPING_KEYS.contains(&key.as_str()) {
            continue;
        }

        if !Breakdown::is_complete(key) {
            warn!(key = %key, "breakdown key does not decompose, keeping as-is");
        }

        let breakdown = Breakdown::parse(key);
        let value = coerce_int(value).ok_or_else(|| Error::BreakdownValue(key.clone()))?;

        rows.push(TotalRow {
            category: breakdown.category,
            age: breakdown.age,
            gender: breakdown.gender,
            value,
        });
    }

    Ok(rows)
}

/// Pass-through stage for the three-day aggregate table.
///
/// The source pre-aggregates these; kept as a named stage alongside the
/// other transforms.
pub fn transform_three_day(records: Vec<DailyRecord>) -> Vec<DailyRecord> {
    records
}

/// Pass-through stage for the weekly aggregate table.
pub fn transform_weekly(records: Vec<DailyRecord>) -> Vec<DailyRecord> {
    records
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
