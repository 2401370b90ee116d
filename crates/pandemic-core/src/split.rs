//! Model-input datasets cut from the integrated snapshot.

use pandemic_model::PipelineConfig;
use polars::prelude::DataFrame;
use tracing::info;

use crate::error::Result;
use crate::select::present_columns;

/// Keep the allow-listed columns present in `df` and drop rows with any missing value.
pub fn model_dataset(df: &DataFrame, dataset: &str, allow_list: &[String]) -> Result<DataFrame> {
    let present = present_columns(df, allow_list);
    let projected = df.select(present)?;
    let complete = projected.drop_nulls::<String>(None)?;
    info!(
        dataset,
        rows = complete.height(),
        columns = complete.width(),
        dropped = projected.height() - complete.height(),
        "model dataset"
    );
    Ok(complete)
}

/// Regression and classification inputs, in that order.
pub fn split_datasets(
    integrated: &DataFrame,
    config: &PipelineConfig,
) -> Result<(DataFrame, DataFrame)> {
    let regression = model_dataset(integrated, "regression", &config.regression_columns)?;
    let classification = model_dataset(
        integrated,
        "classification",
        &config.classification_columns,
    )?;
    Ok((regression, classification))
}
