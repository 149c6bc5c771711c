//! Breakdown-key decomposition.
//!
//! The source encodes its all-time breakdown as flat keys of the form
//! `<category>_<age-band>_<gender>` (e.g. `cases_18_39_male`). The age
//! band itself may contain underscores, so the rule is positional: first
//! token is the category, last token is the gender, everything between is
//! the age band and may be empty (aggregate rows like `cases_male`).

/// A decomposed breakdown key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    pub category: String,
    /// Age-band token(s) rejoined with `_`; empty for aggregate rows.
    pub age: String,
    pub gender: String,
}

impl Breakdown {
    /// Decompose a composite key.
    ///
    /// Never fails: a single-token key yields that token as both category
    /// and gender. Callers that care should check [`Breakdown::is_complete`]
    /// and log the key as a data-quality problem rather than drop it.
    pub fn parse(key: &str) -> Self {
        let tokens: Vec<&str> = key.split('_').collect();
        let category = tokens.first().copied().unwrap_or_default().to_string();
        let gender = tokens.last().copied().unwrap_or_default().to_string();
        let age = if tokens.len() > 2 {
            tokens[1..tokens.len() - 1].join("_")
        } else {
            String::new()
        };

        Self {
            category,
            age,
            gender,
        }
    }

    /// A key decomposes fully only with distinct category and gender tokens.
    pub fn is_complete(key: &str) -> bool {
        key.contains('_')
    }
}
