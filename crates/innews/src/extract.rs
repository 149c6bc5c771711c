//! Embedded-JSON extraction from the source page.
//!
//! The page carries its data as plain-text assignments inside the script
//! element at a fixed position among all script tags:
//!
//! ```text
//! var daily_stats = [...];
//! var weekly_stats = [...];
//! var three_days_stats = [...];
//! var total_stats = {...};
//! ```
//!
//! This is inherently brittle scraping, so it lives behind this one
//! narrow function; nothing downstream knows how the tables were found.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

use stats_core::{Error, RawBundle, RawTotals, Result};

/// Positional index of the data-bearing script element on the page.
const SCRIPT_INDEX: usize = 2;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("script tag pattern"));

// The literals sit on a single line each, so `.` staying line-bound is
// what keeps each match from swallowing the next assignment.
static DAILY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var daily_stats = (\[.*\])").expect("daily_stats pattern"));
static WEEKLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var weekly_stats = (\[.*\])").expect("weekly_stats pattern"));
static THREE_DAYS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"var three_days_stats = (\[.*\])").expect("three_days_stats pattern")
});
static TOTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var total_stats = (\{.*\})").expect("total_stats pattern"));

/// Extract the four raw tables from the source page HTML.
///
/// Each table is extracted independently; any missing script element,
/// missing assignment, or malformed JSON literal fails the whole call.
pub fn extract(html: &str) -> Result<RawBundle> {
    let script = nth_script_body(html, SCRIPT_INDEX)?;

    Ok(RawBundle {
        daily: parse_blob(script, &DAILY_RE, "daily_stats")?,
        weekly: parse_blob(script, &WEEKLY_RE, "weekly_stats")?,
        three_day: parse_blob(script, &THREE_DAYS_RE, "three_days_stats")?,
        total: parse_blob::<RawTotals>(script, &TOTAL_RE, "total_stats")?,
    })
}

/// Body of the `index`-th script element on the page.
fn nth_script_body(html: &str, index: usize) -> Result<&str> {
    let bodies: Vec<&str> = SCRIPT_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();

    bodies.get(index).copied().ok_or(Error::ScriptMissing {
        index,
        found: bodies.len(),
    })
}

fn parse_blob<T: DeserializeOwned>(script: &str, re: &Regex, name: &'static str) -> Result<T> {
    let literal = re
        .captures(script)
        .and_then(|c| c.get(1))
        .ok_or(Error::BlobMissing(name))?;

    serde_json::from_str(literal.as_str()).map_err(|source| Error::BlobMalformed { name, source })
}
