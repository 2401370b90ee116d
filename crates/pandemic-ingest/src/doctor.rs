//! Setup checks run before the pipeline: are the raw files there and do they look usable?

use std::path::Path;

use pandemic_core::data_utils::{column_missing_count, format_date, has_column};
use pandemic_core::frame_utils::{country_keys, date_keys, date_span, distinct_countries};
use pandemic_model::columns::{
    COUNTRY, DATE, NEW_CASES, PEOPLE_VACCINATED, TOTAL_CASES, TOTAL_DEATHS, TOTAL_VACCINATIONS,
};
use pandemic_model::datasets::{COVID_RAW, VACCINATION_RAW};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::DataCatalog;
use crate::csv_io::read_csv_sample;

/// Rows read from each file when inspecting it.
pub const DOCTOR_SAMPLE_ROWS: usize = 1000;
const TOP_MISSING: usize = 5;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

const COVID_DOCTOR_REQUIRED: [&str; 5] = [COUNTRY, DATE, TOTAL_CASES, NEW_CASES, TOTAL_DEATHS];
const VACCINATION_DOCTOR_REQUIRED: [&str; 4] =
    [COUNTRY, DATE, TOTAL_VACCINATIONS, PEOPLE_VACCINATED];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingColumn {
    pub column: String,
    pub missing_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetCheck {
    pub dataset: String,
    pub path: String,
    pub exists: bool,
    pub size_mb: Option<f64>,
    pub sampled_rows: usize,
    pub columns: usize,
    pub date_min: Option<String>,
    pub date_max: Option<String>,
    pub n_countries: usize,
    pub top_missing: Vec<MissingColumn>,
    pub missing_required: Vec<String>,
    pub error: Option<String>,
}

impl DatasetCheck {
    pub fn passed(&self) -> bool {
        self.exists && self.error.is_none() && self.missing_required.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub schema: String,
    pub schema_version: u32,
    pub data_dir: String,
    pub datasets: Vec<DatasetCheck>,
}

impl DoctorReport {
    pub fn passed(&self) -> bool {
        self.datasets.iter().all(DatasetCheck::passed)
    }
}

/// Check both raw datasets of `catalog`.
pub fn run_doctor(catalog: &DataCatalog) -> DoctorReport {
    let datasets = vec![
        check_dataset(catalog, COVID_RAW, &COVID_DOCTOR_REQUIRED),
        check_dataset(catalog, VACCINATION_RAW, &VACCINATION_DOCTOR_REQUIRED),
    ];
    DoctorReport {
        schema: "pandemic-prep.doctor".to_string(),
        schema_version: 1,
        data_dir: catalog.root().display().to_string(),
        datasets,
    }
}

fn check_dataset(catalog: &DataCatalog, dataset: &str, required: &[&str]) -> DatasetCheck {
    let path = catalog.path_for(dataset);
    let mut check = DatasetCheck {
        dataset: dataset.to_string(),
        path: path.display().to_string(),
        ..DatasetCheck::default()
    };
    let Some(size_mb) = file_size_mb(&path) else {
        warn!(dataset, path = %path.display(), "raw file not found");
        return check;
    };
    check.exists = true;
    check.size_mb = Some(size_mb);

    let sample = match read_csv_sample(&path, DOCTOR_SAMPLE_ROWS) {
        Ok(sample) => sample,
        Err(err) => {
            warn!(dataset, error = %err, "raw file could not be read");
            check.error = Some(format!("{err:#}"));
            return check;
        }
    };
    if let Err(err) = inspect(&sample, &mut check) {
        check.error = Some(err.to_string());
    }
    check.missing_required = required
        .iter()
        .filter(|name| !has_column(&sample, name))
        .map(|name| (*name).to_string())
        .collect();
    if !check.missing_required.is_empty() {
        warn!(dataset, missing = ?check.missing_required, "required columns missing");
    }
    info!(
        dataset,
        size_mb,
        rows = check.sampled_rows,
        columns = check.columns,
        countries = check.n_countries,
        "raw file inspected"
    );
    check
}

fn file_size_mb(path: &Path) -> Option<f64> {
    let metadata = std::fs::metadata(path).ok()?;
    metadata
        .is_file()
        .then(|| (metadata.len() as f64 / BYTES_PER_MB * 100.0).round() / 100.0)
}

fn inspect(sample: &DataFrame, check: &mut DatasetCheck) -> pandemic_core::Result<()> {
    check.sampled_rows = sample.height();
    check.columns = sample.width();
    if let Some((first, last)) = date_span(&date_keys(sample)?) {
        check.date_min = Some(format_date(first));
        check.date_max = Some(format_date(last));
    }
    check.n_countries = distinct_countries(&country_keys(sample)?);
    check.top_missing = top_missing_columns(sample, TOP_MISSING);
    Ok(())
}

/// Columns with missing values, highest percentage first.
pub fn top_missing_columns(df: &DataFrame, limit: usize) -> Vec<MissingColumn> {
    if df.height() == 0 {
        return Vec::new();
    }
    let mut columns: Vec<MissingColumn> = df
        .get_columns()
        .iter()
        .map(|column| (column, column_missing_count(column)))
        .filter(|(_, missing)| *missing > 0)
        .map(|(column, missing)| MissingColumn {
            column: column.name().to_string(),
            missing_pct: (missing as f64 / df.height() as f64 * 10_000.0).round() / 100.0,
        })
        .collect();
    columns.sort_by(|left, right| right.missing_pct.total_cmp(&left.missing_pct));
    columns.truncate(limit);
    columns
}
