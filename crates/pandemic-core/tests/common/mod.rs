#![allow(dead_code)]

use pandemic_core::data_utils::{any_to_string, column_f64_values};
use polars::prelude::{Column, DataFrame};

pub fn covid_frame(rows: &[(&str, &str, Option<f64>, Option<f64>)]) -> DataFrame {
    DataFrame::new(vec![
        Column::new(
            "country".into(),
            rows.iter().map(|r| r.0).collect::<Vec<_>>(),
        ),
        Column::new("date".into(), rows.iter().map(|r| r.1).collect::<Vec<_>>()),
        Column::new(
            "total_cases".into(),
            rows.iter().map(|r| r.2).collect::<Vec<_>>(),
        ),
        Column::new(
            "total_deaths".into(),
            rows.iter().map(|r| r.3).collect::<Vec<_>>(),
        ),
    ])
    .expect("covid frame")
}

pub fn vaccination_frame(rows: &[(&str, &str, Option<f64>)]) -> DataFrame {
    DataFrame::new(vec![
        Column::new(
            "country".into(),
            rows.iter().map(|r| r.0).collect::<Vec<_>>(),
        ),
        Column::new("date".into(), rows.iter().map(|r| r.1).collect::<Vec<_>>()),
        Column::new(
            "total_vaccinations".into(),
            rows.iter().map(|r| r.2).collect::<Vec<_>>(),
        ),
    ])
    .expect("vaccination frame")
}

pub fn f64s(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    column_f64_values(df, name)
        .expect("numeric column")
        .unwrap_or_else(|| panic!("column {name} missing"))
}

pub fn strings(df: &DataFrame, name: &str) -> Vec<String> {
    let column = df.column(name).expect("column");
    (0..df.height())
        .map(|idx| any_to_string(column.get(idx).expect("cell")))
        .collect()
}

pub fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}
