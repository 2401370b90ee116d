//! Polars `AnyValue` and column helpers.
//!
//! Stages work row-wise through these helpers instead of relying on a
//! particular grouping or join implementation, so ordering guarantees stay
//! explicit.

use chrono::{Days, NaiveDate};
use polars::prelude::{AnyValue, Column, DataFrame, DataType};

use crate::error::Result;

const ISO_DATE: &str = "%Y-%m-%d";

pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(value) => value.to_string(),
        AnyValue::StringOwned(value) => value.to_string(),
        AnyValue::Float64(value) => format_numeric(value),
        AnyValue::Float32(value) => format_numeric(f64::from(value)),
        other => other.to_string(),
    }
}

pub fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Numeric view of a cell; NaN counts as missing.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    let number = match value {
        AnyValue::Null => None,
        AnyValue::Float32(value) => Some(f64::from(value)),
        AnyValue::Float64(value) => Some(value),
        AnyValue::Int8(value) => Some(f64::from(value)),
        AnyValue::Int16(value) => Some(f64::from(value)),
        AnyValue::Int32(value) => Some(f64::from(value)),
        AnyValue::Int64(value) => Some(value as f64),
        AnyValue::UInt8(value) => Some(f64::from(value)),
        AnyValue::UInt16(value) => Some(f64::from(value)),
        AnyValue::UInt32(value) => Some(f64::from(value)),
        AnyValue::UInt64(value) => Some(value as f64),
        AnyValue::String(value) => parse_f64(value),
        AnyValue::StringOwned(value) => parse_f64(&value),
        _ => None,
    };
    number.filter(|value| !value.is_nan())
}

pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}

pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names()
        .iter()
        .any(|column| column.as_str() == name)
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Values of a column as `f64`, or `None` when the column is absent.
pub fn column_f64_values(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    Ok(Some(column_to_f64(column)?))
}

pub fn column_to_f64(column: &Column) -> Result<Vec<Option<f64>>> {
    let cast = column.cast(&DataType::Float64)?;
    let values = cast
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect();
    Ok(values)
}

/// Numeric view of a column that may have been read as text.
///
/// Numeric and all-null columns convert directly; a text column converts
/// when every non-empty cell parses as a number. Anything else is `None`.
pub fn numeric_values(column: &Column) -> Result<Option<Vec<Option<f64>>>> {
    let dtype = column.dtype();
    if is_numeric_dtype(dtype) || matches!(dtype, DataType::Null) {
        return Ok(Some(column_to_f64(column)?));
    }
    if !matches!(dtype, DataType::String) {
        return Ok(None);
    }
    let mut values = Vec::with_capacity(column.len());
    for cell in column.str()? {
        match cell {
            None => values.push(None),
            Some(text) if text.trim().is_empty() => values.push(None),
            Some(text) => match text.trim().parse::<f64>() {
                Ok(value) => values.push(Some(value).filter(|v| !v.is_nan())),
                Err(_) => return Ok(None),
            },
        }
    }
    Ok(Some(values))
}

/// Date of a cell: native `Date` values or ISO text (a time suffix is ignored).
pub fn any_to_date(value: AnyValue<'_>) -> Option<NaiveDate> {
    match value {
        AnyValue::Null => None,
        AnyValue::Date(days) => date_from_epoch_days(days),
        other => parse_date(&any_to_string(other)),
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, ISO_DATE).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    if days >= 0 {
        epoch.checked_add_days(Days::new(u64::from(days.unsigned_abs())))
    } else {
        epoch.checked_sub_days(Days::new(u64::from(days.unsigned_abs())))
    }
}

/// Missing cells of one column: nulls plus float NaN.
pub fn column_missing_count(column: &Column) -> usize {
    let nan = match column.dtype() {
        DataType::Float64 => column
            .f64()
            .map(|ca| ca.into_iter().filter(|v| v.is_some_and(f64::is_nan)).count())
            .unwrap_or(0),
        DataType::Float32 => column
            .f32()
            .map(|ca| ca.into_iter().filter(|v| v.is_some_and(f32::is_nan)).count())
            .unwrap_or(0),
        _ => 0,
    };
    column.null_count() + nan
}

/// Number of missing cells across the whole frame.
pub fn missing_cell_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(column_missing_count).sum()
}
