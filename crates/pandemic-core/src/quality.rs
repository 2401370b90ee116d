//! Data quality summary of the validated source tables.

use pandemic_model::QualityRecord;
use pandemic_model::datasets::{COVID_LABEL, VACCINATION_LABEL};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::info;

use crate::data_utils::{format_date, missing_cell_count};
use crate::error::Result;
use crate::frame_utils::{country_keys, date_keys, date_span, distinct_countries};

pub fn quality_record(df: &DataFrame, dataset: &str) -> Result<QualityRecord> {
    let cells = df.height() * df.width();
    let missing_data_pct = if cells == 0 {
        0.0
    } else {
        round2(missing_cell_count(df) as f64 / cells as f64 * 100.0)
    };
    let span = date_span(&date_keys(df)?);
    Ok(QualityRecord {
        dataset: dataset.to_string(),
        n_rows: df.height(),
        n_columns: df.width(),
        n_countries: distinct_countries(&country_keys(df)?),
        date_min: span.map(|(first, _)| format_date(first)),
        date_max: span.map(|(_, last)| format_date(last)),
        missing_data_pct,
    })
}

/// Records for the case/death table followed by the vaccination table.
pub fn quality_records(covid: &DataFrame, vaccination: &DataFrame) -> Result<Vec<QualityRecord>> {
    Ok(vec![
        quality_record(covid, COVID_LABEL)?,
        quality_record(vaccination, VACCINATION_LABEL)?,
    ])
}

pub fn quality_report(covid: &DataFrame, vaccination: &DataFrame) -> Result<DataFrame> {
    let records = quality_records(covid, vaccination)?;
    for record in &records {
        info!(
            dataset = %record.dataset,
            rows = record.n_rows,
            columns = record.n_columns,
            countries = record.n_countries,
            date_range = %record.date_range(),
            missing_pct = record.missing_data_pct,
            "quality summary"
        );
    }
    records_to_frame(&records)
}

pub fn records_to_frame(records: &[QualityRecord]) -> Result<DataFrame> {
    let dataset: Vec<&str> = records.iter().map(|r| r.dataset.as_str()).collect();
    let n_rows: Vec<u64> = records.iter().map(|r| r.n_rows as u64).collect();
    let n_columns: Vec<u64> = records.iter().map(|r| r.n_columns as u64).collect();
    let n_countries: Vec<u64> = records.iter().map(|r| r.n_countries as u64).collect();
    let date_min: Vec<Option<&str>> = records.iter().map(|r| r.date_min.as_deref()).collect();
    let date_max: Vec<Option<&str>> = records.iter().map(|r| r.date_max.as_deref()).collect();
    let missing: Vec<f64> = records.iter().map(|r| r.missing_data_pct).collect();
    let columns: Vec<Column> = vec![
        Series::new("dataset".into(), dataset).into_column(),
        Series::new("n_rows".into(), n_rows).into_column(),
        Series::new("n_columns".into(), n_columns).into_column(),
        Series::new("n_countries".into(), n_countries).into_column(),
        Series::new("date_min".into(), date_min).into_column(),
        Series::new("date_max".into(), date_max).into_column(),
        Series::new("missing_data_pct".into(), missing).into_column(),
    ];
    Ok(DataFrame::new(columns)?)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(100.0 / 3.0), 33.33);
        assert_eq!(round2(2.0 / 3.0 * 100.0), 66.67);
        assert_eq!(round2(0.0), 0.0);
    }
}
