//! Row keys and stable partitioning over observation tables.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use pandemic_model::columns::{COUNTRY, DATE};
use polars::prelude::{AnyValue, DataFrame, IdxCa, IdxSize};

use crate::data_utils::{any_to_date, any_to_string};
use crate::error::Result;

/// Country part of an observation key. Missing names order last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CountryKey {
    Name(String),
    Missing,
}

impl CountryKey {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Missing => None,
        }
    }
}

/// Date part of an observation key.
///
/// Parsed dates order chronologically, unparseable text after them and
/// missing dates last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateKey {
    Date(NaiveDate),
    Text(String),
    Missing,
}

impl DateKey {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationKey {
    pub country: CountryKey,
    pub date: DateKey,
}

fn country_key(value: AnyValue<'_>) -> CountryKey {
    match value {
        AnyValue::Null => CountryKey::Missing,
        other => CountryKey::Name(any_to_string(other)),
    }
}

fn date_key(value: AnyValue<'_>) -> DateKey {
    if value.is_null() {
        return DateKey::Missing;
    }
    let text = any_to_string(value.clone());
    match any_to_date(value) {
        Some(date) => DateKey::Date(date),
        None => DateKey::Text(text),
    }
}

/// Country key of every row; all `Missing` when the column is absent.
pub fn country_keys(df: &DataFrame) -> Result<Vec<CountryKey>> {
    let Ok(column) = df.column(COUNTRY) else {
        return Ok(vec![CountryKey::Missing; df.height()]);
    };
    let mut keys = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        keys.push(country_key(column.get(idx)?));
    }
    Ok(keys)
}

/// Date key of every row; all `Missing` when the column is absent.
pub fn date_keys(df: &DataFrame) -> Result<Vec<DateKey>> {
    let Ok(column) = df.column(DATE) else {
        return Ok(vec![DateKey::Missing; df.height()]);
    };
    let mut keys = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        keys.push(date_key(column.get(idx)?));
    }
    Ok(keys)
}

pub fn observation_keys(df: &DataFrame) -> Result<Vec<ObservationKey>> {
    let countries = country_keys(df)?;
    let dates = date_keys(df)?;
    Ok(countries
        .into_iter()
        .zip(dates)
        .map(|(country, date)| ObservationKey { country, date })
        .collect())
}

/// Row indices grouped by key, each group in original row order.
pub fn partition_rows<K: Ord + Clone>(keys: &[K]) -> BTreeMap<K, Vec<usize>> {
    let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (idx, key) in keys.iter().enumerate() {
        groups.entry(key.clone()).or_default().push(idx);
    }
    groups
}

pub fn distinct_countries(keys: &[CountryKey]) -> usize {
    partition_rows(keys)
        .keys()
        .filter(|key| key.name().is_some())
        .count()
}

/// Earliest and latest parsed date.
pub fn date_span(keys: &[DateKey]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = keys.iter().filter_map(DateKey::date);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(min, max), date| {
        (min.min(date), max.max(date))
    }))
}

/// New frame holding the given rows in the given order.
pub fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx: Vec<IdxSize> = indices.iter().map(|&i| i as IdxSize).collect();
    let idx = IdxCa::from_vec("row".into(), idx);
    Ok(df.take(&idx)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_sort_last() {
        let mut keys = vec![
            CountryKey::Missing,
            CountryKey::Name("b".to_string()),
            CountryKey::Name("a".to_string()),
        ];
        keys.sort();
        assert_eq!(keys[0], CountryKey::Name("a".to_string()));
        assert_eq!(keys[2], CountryKey::Missing);

        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert!(DateKey::Date(date) < DateKey::Text("soon".to_string()));
        assert!(DateKey::Text("soon".to_string()) < DateKey::Missing);
    }

    #[test]
    fn partitions_preserve_row_order() {
        let keys = vec!["x", "y", "x", "y", "x"];
        let groups = partition_rows(&keys);
        assert_eq!(groups["x"], vec![0, 2, 4]);
        assert_eq!(groups["y"], vec![1, 3]);
    }

    #[test]
    fn span_ignores_unparsed_dates() {
        let early = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        let late = NaiveDate::from_ymd_opt(2021, 2, 3).unwrap();
        let keys = vec![
            DateKey::Date(late),
            DateKey::Missing,
            DateKey::Text("n/a".to_string()),
            DateKey::Date(early),
        ];
        assert_eq!(date_span(&keys), Some((early, late)));
        assert_eq!(date_span(&[DateKey::Missing]), None);
    }
}
