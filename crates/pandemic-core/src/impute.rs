//! Missing-value imputation.
//!
//! Count-like columns are zero-filled, slowly varying socioeconomic columns
//! take the median of their observed values, and every vaccination measure
//! is zero-filled. Imputed columns come back as `Float64`.

use pandemic_model::PipelineConfig;
use pandemic_model::columns::is_key_column;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::{debug, info, warn};

use crate::data_utils::{column_names, missing_cell_count, numeric_values};
use crate::error::Result;

/// Median of the observed values; `None` when nothing was observed.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut observed: Vec<f64> = values.iter().flatten().copied().collect();
    if observed.is_empty() {
        return None;
    }
    observed.sort_by(f64::total_cmp);
    let mid = observed.len() / 2;
    if observed.len() % 2 == 0 {
        Some((observed[mid - 1] + observed[mid]) / 2.0)
    } else {
        Some(observed[mid])
    }
}

/// Replace missing entries of `values` with `fill` and write them back as `name`.
fn fill_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<f64>>,
    fill: f64,
) -> Result<usize> {
    let filled = values.iter().filter(|v| v.is_none()).count();
    let values: Vec<f64> = values.into_iter().map(|v| v.unwrap_or(fill)).collect();
    df.with_column(Series::new(name.into(), values))?;
    Ok(filled)
}

/// Numeric values of a fillable column; `None` when absent or not numeric.
fn fillable(df: &DataFrame, dataset: &str, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let values = numeric_values(column)?;
    if values.is_none() {
        warn!(
            dataset,
            column = %name,
            dtype = %column.dtype(),
            "skipping fill of non-numeric column"
        );
    }
    Ok(values)
}

/// Impute `zero_fill` columns with 0 and `median_fill` columns with their median.
///
/// Names absent from `df` are skipped. Columns read as text are filled when
/// their cells parse as numbers. A median column with no observed value
/// stays missing.
pub fn impute(
    df: &DataFrame,
    dataset: &str,
    zero_fill: &[&str],
    median_fill: &[&str],
) -> Result<DataFrame> {
    let mut out = df.clone();
    for name in zero_fill {
        let Some(values) = fillable(&out, dataset, name)? else {
            continue;
        };
        let filled = fill_column(&mut out, name, values, 0.0)?;
        debug!(dataset, column = %name, filled, "zero filled");
    }
    for name in median_fill {
        let Some(values) = fillable(&out, dataset, name)? else {
            continue;
        };
        let Some(fill) = median(&values) else {
            warn!(dataset, column = %name, "column has no observed values; left missing");
            continue;
        };
        let filled = fill_column(&mut out, name, values, fill)?;
        debug!(dataset, column = %name, median = fill, filled, "median filled");
    }
    info!(
        dataset,
        missing_before = missing_cell_count(df),
        missing_after = missing_cell_count(&out),
        "imputed"
    );
    Ok(out)
}

/// Case/death imputation driven by the configured strategy table.
pub fn impute_covid(df: &DataFrame, dataset: &str, config: &PipelineConfig) -> Result<DataFrame> {
    impute(
        df,
        dataset,
        &config.zero_fill_columns(),
        &config.median_fill_columns(),
    )
}

/// Zero-fill every numeric non-key column of a vaccination table.
///
/// Measures read as text, including entirely empty ones, count as numeric.
pub fn impute_vaccinations(df: &DataFrame, dataset: &str) -> Result<DataFrame> {
    let names = column_names(df);
    let zero_fill: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| !is_key_column(name))
        .collect();
    impute(df, dataset, &zero_fill, &[])
}
