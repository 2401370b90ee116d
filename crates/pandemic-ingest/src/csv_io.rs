//! CSV reading and writing through Polars.
//!
//! Dates in ISO form are parsed on read so the stages see `Date` columns;
//! everything else keeps the dtype Polars infers.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};

/// Rows inspected when inferring column dtypes.
const INFER_SCHEMA_ROWS: usize = 10_000;

fn read_options(n_rows: Option<usize>) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_n_rows(n_rows)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .map_parse_options(|options| options.with_try_parse_dates(true))
}

/// Read a whole CSV file.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        anyhow::bail!("CSV file not found: {}", path.display());
    }
    let df = read_options(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to read CSV: {}", path.display()))?;
    Ok(df)
}

/// Read at most `n_rows` data rows of a CSV file.
pub fn read_csv_sample(path: &Path, n_rows: usize) -> Result<DataFrame> {
    let df = read_options(Some(n_rows))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to sample CSV: {}", path.display()))?;
    Ok(df)
}

/// Write `df` with a header row, creating parent directories as needed.
pub fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
    Ok(())
}
