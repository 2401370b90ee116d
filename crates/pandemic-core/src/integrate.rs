//! Per-country snapshot of the case/death and vaccination tables.

use std::collections::{BTreeMap, BTreeSet};

use pandemic_model::columns::{COUNTRY, COVID_SUFFIX, VACC_SUFFIX};
use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, Series};
use tracing::{debug, info};

use crate::data_utils::column_names;
use crate::error::Result;
use crate::frame_utils::{CountryKey, country_keys, date_keys, distinct_countries, take_rows};

/// Row index of the chronologically last observation of each country.
///
/// Among rows sharing the latest date the later row wins. Rows without a
/// country are dropped.
pub fn latest_rows(df: &DataFrame) -> Result<BTreeMap<String, usize>> {
    let countries = country_keys(df)?;
    let dates = date_keys(df)?;
    let mut latest: BTreeMap<String, usize> = BTreeMap::new();
    for (idx, country) in countries.iter().enumerate() {
        let CountryKey::Name(name) = country else {
            continue;
        };
        latest
            .entry(name.clone())
            .and_modify(|best| {
                if dates[idx] >= dates[*best] {
                    *best = idx;
                }
            })
            .or_insert(idx);
    }
    let dropped = countries.len() - countries.iter().filter(|c| c.name().is_some()).count();
    if dropped > 0 {
        debug!(dropped, "rows without country ignored");
    }
    Ok(latest)
}

/// One row per country, ordered by country.
pub fn latest_per_country(df: &DataFrame) -> Result<DataFrame> {
    let latest = latest_rows(df)?;
    let indices: Vec<usize> = latest.into_values().collect();
    take_rows(df, &indices)
}

fn suffixed(name: &str, collisions: &BTreeSet<String>, suffix: &str) -> String {
    if collisions.contains(name) {
        format!("{name}{suffix}")
    } else {
        name.to_string()
    }
}

/// Left join of the latest vaccination row onto the latest case/death row.
///
/// Every case/death country survives; countries without vaccination data get
/// missing vaccination fields. Shared non-key column names are suffixed with
/// `_covid` and `_vacc`.
pub fn integrate(covid: &DataFrame, vaccination: &DataFrame) -> Result<DataFrame> {
    let left = latest_per_country(covid)?;
    let right = latest_per_country(vaccination)?;

    let left_names = column_names(&left);
    let right_names = column_names(&right);
    let collisions: BTreeSet<String> = left_names
        .iter()
        .filter(|name| name.as_str() != COUNTRY && right_names.contains(name))
        .cloned()
        .collect();

    let right_rows: BTreeMap<String, usize> = country_keys(&right)?
        .into_iter()
        .enumerate()
        .filter_map(|(idx, key)| match key {
            CountryKey::Name(name) => Some((name, idx)),
            CountryKey::Missing => None,
        })
        .collect();
    let matches: Vec<Option<usize>> = country_keys(&left)?
        .iter()
        .map(|key| key.name().and_then(|name| right_rows.get(name).copied()))
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(left.width() + right.width());
    for column in left.get_columns() {
        let name = suffixed(column.name().as_str(), &collisions, COVID_SUFFIX);
        columns.push(column.clone().with_name(name.into()));
    }
    for column in right.get_columns() {
        if column.name().as_str() == COUNTRY {
            continue;
        }
        let name = suffixed(column.name().as_str(), &collisions, VACC_SUFFIX);
        let mut values: Vec<AnyValue<'static>> = Vec::with_capacity(matches.len());
        for matched in &matches {
            let value = match matched {
                Some(idx) => column.get(*idx)?.into_static(),
                None => AnyValue::Null,
            };
            values.push(value);
        }
        let series =
            Series::from_any_values_and_dtype(name.into(), &values, column.dtype(), false)?;
        columns.push(series.into_column());
    }
    let integrated = DataFrame::new(columns)?;

    let matched = matches.iter().filter(|m| m.is_some()).count();
    info!(
        rows = integrated.height(),
        countries = distinct_countries(&country_keys(&integrated)?),
        with_vaccination = matched,
        "integrated"
    );
    Ok(integrated)
}
