mod common;

use polars::prelude::{Column, DataFrame};

use common::{covid_frame, f64s, names, strings};
use pandemic_core::{PipelineError, add_covid_features, validate_observations};

fn required() -> Vec<String> {
    names(&["country", "date", "total_cases"])
}

#[test]
fn later_duplicate_replaces_earlier_row() {
    let raw = covid_frame(&[
        ("X", "2021-01-01", Some(10.0), Some(1.0)),
        ("X", "2021-01-01", Some(12.0), Some(1.0)),
        ("X", "2021-01-02", Some(20.0), Some(2.0)),
    ]);

    let validated = validate_observations(&raw, "covid", &required()).expect("validate");

    assert_eq!(validated.height(), 2);
    assert_eq!(strings(&validated, "date"), vec!["2021-01-01", "2021-01-02"]);
    assert_eq!(f64s(&validated, "total_cases"), vec![Some(12.0), Some(20.0)]);
    assert_eq!(f64s(&validated, "total_deaths"), vec![Some(1.0), Some(2.0)]);

    let features = add_covid_features(&validated).expect("features");
    let rates = f64s(&features, "death_rate");
    common::assert_close(rates[0].expect("rate"), 8.33);
    common::assert_close(rates[1].expect("rate"), 10.0);
}

#[test]
fn rows_are_sorted_by_country_then_date() {
    let raw = covid_frame(&[
        ("B", "2021-01-02", Some(3.0), None),
        ("A", "2021-01-03", Some(2.0), None),
        ("B", "2021-01-01", Some(1.0), None),
        ("A", "2021-01-01", Some(4.0), None),
    ]);

    let validated = validate_observations(&raw, "covid", &required()).expect("validate");

    assert_eq!(strings(&validated, "country"), vec!["A", "A", "B", "B"]);
    assert_eq!(
        strings(&validated, "date"),
        vec!["2021-01-01", "2021-01-03", "2021-01-01", "2021-01-02"]
    );
    assert_eq!(validated.width(), raw.width());
}

#[test]
fn dates_compare_chronologically_not_lexically() {
    let raw = covid_frame(&[
        ("A", "2021-10-01", Some(2.0), None),
        ("A", "2021-09-30 00:00:00", Some(1.0), None),
    ]);

    let validated = validate_observations(&raw, "covid", &required()).expect("validate");

    assert_eq!(f64s(&validated, "total_cases"), vec![Some(1.0), Some(2.0)]);
}

#[test]
fn empty_table_is_a_schema_error() {
    let raw = covid_frame(&[]);

    let err = validate_observations(&raw, "covid_compact_raw", &required()).unwrap_err();

    assert!(err.is_schema());
    assert!(err.to_string().contains("empty"), "{err}");
}

#[test]
fn missing_required_columns_are_named() {
    let raw = DataFrame::new(vec![
        Column::new("country".into(), ["A"]),
        Column::new("new_cases".into(), [1.0]),
    ])
    .expect("df");

    let err = validate_observations(&raw, "covid_compact_raw", &required()).unwrap_err();

    match err {
        PipelineError::Schema { dataset, message } => {
            assert_eq!(dataset, "covid_compact_raw");
            assert!(message.contains("date"), "{message}");
            assert!(message.contains("total_cases"), "{message}");
            assert!(!message.contains("country"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rows_with_missing_country_sort_last() {
    let raw = DataFrame::new(vec![
        Column::new("country".into(), [None, Some("A")]),
        Column::new("date".into(), ["2021-01-01", "2021-01-01"]),
        Column::new("total_cases".into(), [1.0, 2.0]),
    ])
    .expect("df");

    let validated = validate_observations(&raw, "covid", &required()).expect("validate");

    assert_eq!(f64s(&validated, "total_cases"), vec![Some(2.0), Some(1.0)]);
}
