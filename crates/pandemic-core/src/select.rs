use polars::prelude::DataFrame;
use tracing::{debug, info};

use crate::data_utils::has_column;
use crate::error::Result;

/// Allow-listed columns that exist in `df`, in allow-list order, without repeats.
pub fn present_columns<'a>(df: &DataFrame, allow_list: &'a [String]) -> Vec<&'a str> {
    let mut present: Vec<&str> = Vec::with_capacity(allow_list.len());
    for name in allow_list {
        if present.contains(&name.as_str()) {
            continue;
        }
        if has_column(df, name) {
            present.push(name);
        } else {
            debug!(column = %name, "allow-listed column not present");
        }
    }
    present
}

/// Restrict `df` to the allow-listed columns it actually has.
///
/// Absent columns are skipped; row count and order are unchanged.
pub fn select_columns(df: &DataFrame, dataset: &str, allow_list: &[String]) -> Result<DataFrame> {
    let present = present_columns(df, allow_list);
    let selected = df.select(present)?;
    info!(
        dataset,
        rows = selected.height(),
        columns_before = df.width(),
        columns_after = selected.width(),
        "selected columns"
    );
    Ok(selected)
}
