//! Validation of raw observation tables.
//!
//! A validated table has every required column, at most one row per
//! (country, date) key and rows ordered by that key ascending.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use tracing::{info, warn};

use crate::data_utils::has_column;
use crate::error::{PipelineError, Result};
use crate::frame_utils::{
    ObservationKey, country_keys, date_keys, date_span, distinct_countries, observation_keys,
    take_rows,
};

/// Validate `df`, keeping the last occurrence of duplicated keys.
///
/// # Errors
///
/// Returns [`PipelineError::Schema`] when the table has no rows or lacks
/// any of `required_columns`.
pub fn validate_observations(
    df: &DataFrame,
    dataset: &str,
    required_columns: &[String],
) -> Result<DataFrame> {
    info!(dataset, rows = df.height(), columns = df.width(), "validating");
    if df.height() == 0 {
        return Err(PipelineError::schema(dataset, "dataset is empty"));
    }
    let missing: Vec<&str> = required_columns
        .iter()
        .map(String::as_str)
        .filter(|name| !has_column(df, name))
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::schema(
            dataset,
            format!("missing required columns: {}", missing.join(", ")),
        ));
    }

    let keys = observation_keys(df)?;
    let kept = last_occurrences(&keys);
    let removed = df.height() - kept.len();
    if removed > 0 {
        warn!(dataset, removed, "dropped duplicate observations");
    }

    let mut order = kept;
    order.sort_by(|left, right| keys[*left].cmp(&keys[*right]));
    let validated = take_rows(df, &order)?;

    let countries = distinct_countries(&country_keys(&validated)?);
    match date_span(&date_keys(&validated)?) {
        Some((first, last)) => info!(
            dataset,
            rows = validated.height(),
            countries,
            first_date = %first,
            last_date = %last,
            "validated"
        ),
        None => info!(dataset, rows = validated.height(), countries, "validated"),
    }
    Ok(validated)
}

/// Indices of the last row for every distinct key, in ascending row order.
fn last_occurrences(keys: &[ObservationKey]) -> Vec<usize> {
    let mut seen = BTreeSet::new();
    let mut keep: Vec<usize> = keys
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, key)| seen.insert(*key))
        .map(|(idx, _)| idx)
        .collect();
    keep.reverse();
    keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_utils::{CountryKey, DateKey};

    fn key(country: &str, date: &str) -> ObservationKey {
        ObservationKey {
            country: CountryKey::Name(country.to_string()),
            date: DateKey::Text(date.to_string()),
        }
    }

    #[test]
    fn later_duplicate_wins() {
        let keys = vec![key("X", "a"), key("X", "a"), key("X", "b"), key("Y", "a")];
        assert_eq!(last_occurrences(&keys), vec![1, 2, 3]);
    }

    #[test]
    fn unique_keys_are_all_kept() {
        let keys = vec![key("X", "a"), key("Y", "a")];
        assert_eq!(last_occurrences(&keys), vec![0, 1]);
    }
}
