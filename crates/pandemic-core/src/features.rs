//! Derived feature columns.
//!
//! Every ratio is total: a zero or missing denominator yields `0.0`, never an
//! infinity or NaN.

use pandemic_model::columns::{
    DEATH_RATE, GDP_PER_CAPITA, HEALTHCARE_CAPACITY_INDEX, HOSPITAL_BEDS_PER_THOUSAND,
    PEOPLE_FULLY_VACCINATED, PEOPLE_VACCINATED, PEOPLE_VACCINATED_PER_HUNDRED, TOTAL_CASES,
    TOTAL_DEATHS, VACCINATION_EFFICIENCY, VACCINATION_SPEED,
};
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::{info, warn};

use crate::data_utils::column_f64_values;
use crate::error::Result;
use crate::frame_utils::{country_keys, partition_rows};

/// Divisor turning beds-per-thousand x GDP into the capacity index.
pub const CAPACITY_INDEX_SCALE: f64 = 10_000.0;

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// `numerator / denominator * 100`, with undefined results mapped to 0.
pub fn percentage(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    match (numerator, denominator) {
        (Some(num), Some(den)) => finite_or_zero(num / den * 100.0),
        _ => 0.0,
    }
}

pub fn capacity_index(beds: Option<f64>, gdp: Option<f64>) -> f64 {
    match (beds, gdp) {
        (Some(beds), Some(gdp)) => finite_or_zero(beds * gdp / CAPACITY_INDEX_SCALE),
        _ => 0.0,
    }
}

/// Difference to the previous value of the same group, in row order.
///
/// The first row of each group, rows without a group and rows where either
/// value is missing get 0.
pub fn grouped_difference<K: Ord + Clone>(
    groups: &[Option<K>],
    values: &[Option<f64>],
) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    for (key, rows) in partition_rows(groups) {
        if key.is_none() {
            continue;
        }
        for pair in rows.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            if let (Some(before), Some(now)) = (values[prev], values[cur]) {
                out[cur] = finite_or_zero(now - before);
            }
        }
    }
    out
}

fn ratio_column(df: &DataFrame, numerator: &str, denominator: &str) -> Result<Option<Vec<f64>>> {
    let (Some(num), Some(den)) = (
        column_f64_values(df, numerator)?,
        column_f64_values(df, denominator)?,
    ) else {
        return Ok(None);
    };
    Ok(Some(
        num.into_iter()
            .zip(den)
            .map(|(num, den)| percentage(num, den))
            .collect(),
    ))
}

/// Add `death_rate` and `healthcare_capacity_index` to a case/death table.
pub fn add_covid_features(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    match ratio_column(df, TOTAL_DEATHS, TOTAL_CASES)? {
        Some(rates) => {
            out.with_column(Series::new(DEATH_RATE.into(), rates))?;
        }
        None => warn!(feature = DEATH_RATE, "source columns missing; skipped"),
    }
    if let (Some(beds), Some(gdp)) = (
        column_f64_values(df, HOSPITAL_BEDS_PER_THOUSAND)?,
        column_f64_values(df, GDP_PER_CAPITA)?,
    ) {
        let index: Vec<f64> = beds
            .into_iter()
            .zip(gdp)
            .map(|(beds, gdp)| capacity_index(beds, gdp))
            .collect();
        out.with_column(Series::new(HEALTHCARE_CAPACITY_INDEX.into(), index))?;
    }
    info!(
        dataset = "covid",
        added = out.width() - df.width(),
        "features created"
    );
    Ok(out)
}

/// Add `vaccination_speed` and `vaccination_efficiency` to a vaccination table.
///
/// Speed is the day-over-day change of `people_vaccinated_per_hundred` within
/// each country, following the existing row order.
pub fn add_vaccination_features(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    match column_f64_values(df, PEOPLE_VACCINATED_PER_HUNDRED)? {
        Some(values) => {
            let countries: Vec<Option<String>> = country_keys(df)?
                .into_iter()
                .map(|key| key.name().map(str::to_string))
                .collect();
            let speed = grouped_difference(&countries, &values);
            out.with_column(Series::new(VACCINATION_SPEED.into(), speed))?;
        }
        None => warn!(feature = VACCINATION_SPEED, "source column missing; skipped"),
    }
    match ratio_column(df, PEOPLE_FULLY_VACCINATED, PEOPLE_VACCINATED)? {
        Some(efficiency) => {
            out.with_column(Series::new(VACCINATION_EFFICIENCY.into(), efficiency))?;
        }
        None => warn!(feature = VACCINATION_EFFICIENCY, "source columns missing; skipped"),
    }
    info!(
        dataset = "vaccination",
        added = out.width() - df.width(),
        "features created"
    );
    Ok(out)
}

pub fn build_features(
    covid: &DataFrame,
    vaccination: &DataFrame,
) -> Result<(DataFrame, DataFrame)> {
    Ok((
        add_covid_features(covid)?,
        add_vaccination_features(vaccination)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_by_zero_is_zero() {
        assert_eq!(percentage(Some(5.0), Some(0.0)), 0.0);
        assert_eq!(percentage(Some(-5.0), Some(0.0)), 0.0);
        assert_eq!(percentage(Some(0.0), Some(0.0)), 0.0);
        assert_eq!(percentage(None, Some(3.0)), 0.0);
        assert_eq!(percentage(Some(1.0), Some(4.0)), 25.0);
    }

    #[test]
    fn capacity_index_scales_product() {
        assert_eq!(capacity_index(Some(2.0), Some(50_000.0)), 10.0);
        assert_eq!(capacity_index(None, Some(50_000.0)), 0.0);
    }

    #[test]
    fn grouped_difference_restarts_per_group() {
        let groups = vec![Some("Y"), Some("Y"), Some("Z"), Some("Y"), Some("Z"), None];
        let values = vec![
            Some(5.0),
            Some(8.0),
            Some(1.0),
            Some(15.0),
            Some(4.0),
            Some(9.0),
        ];
        assert_eq!(
            grouped_difference(&groups, &values),
            vec![0.0, 3.0, 0.0, 7.0, 3.0, 0.0]
        );
    }

    #[test]
    fn grouped_difference_treats_missing_as_zero() {
        let groups = vec![Some(1), Some(1), Some(1)];
        let values = vec![Some(2.0), None, Some(6.0)];
        assert_eq!(grouped_difference(&groups, &values), vec![0.0, 0.0, 0.0]);
    }
}
