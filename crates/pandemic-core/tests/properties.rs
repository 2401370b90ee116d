mod common;

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame};
use proptest::prelude::*;

use common::{f64s, names, strings};
use pandemic_core::{
    add_covid_features, add_vaccination_features, impute_covid, validate_observations,
};
use pandemic_model::PipelineConfig;

const COUNTRIES: [&str; 3] = ["Chile", "Peru", "Spain"];

type Row = (usize, u32, Option<f64>);

fn observations(rows: &[Row]) -> DataFrame {
    DataFrame::new(vec![
        Column::new(
            "country".into(),
            rows.iter().map(|r| COUNTRIES[r.0]).collect::<Vec<_>>(),
        ),
        Column::new(
            "date".into(),
            rows.iter()
                .map(|r| format!("2021-03-{:02}", r.1))
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "total_cases".into(),
            rows.iter().map(|r| r.2).collect::<Vec<_>>(),
        ),
    ])
    .expect("observations")
}

fn row() -> impl Strategy<Value = Row> {
    (
        0..COUNTRIES.len(),
        1u32..6,
        proptest::option::of(0.0f64..1e6),
    )
}

fn required() -> Vec<String> {
    names(&["country", "date", "total_cases"])
}

proptest! {
    #[test]
    fn validation_is_idempotent(rows in prop::collection::vec(row(), 1..40)) {
        let once = validate_observations(&observations(&rows), "covid", &required()).unwrap();
        let twice = validate_observations(&once, "covid", &required()).unwrap();
        prop_assert!(once.equals_missing(&twice));
    }

    #[test]
    fn one_row_per_key_and_it_is_the_last(rows in prop::collection::vec(row(), 1..40)) {
        let validated = validate_observations(&observations(&rows), "covid", &required()).unwrap();

        let mut expected: BTreeMap<(String, String), Option<f64>> = BTreeMap::new();
        for (country, day, cases) in &rows {
            expected.insert(
                (COUNTRIES[*country].to_string(), format!("2021-03-{day:02}")),
                *cases,
            );
        }

        let keys: Vec<(String, String)> = strings(&validated, "country")
            .into_iter()
            .zip(strings(&validated, "date"))
            .collect();
        prop_assert_eq!(keys.len(), expected.len());
        let sorted: Vec<(String, String)> = expected.keys().cloned().collect();
        prop_assert_eq!(&keys, &sorted);
        let cases = f64s(&validated, "total_cases");
        for (key, value) in keys.iter().zip(cases) {
            prop_assert_eq!(expected[key], value);
        }
    }

    #[test]
    fn imputation_is_idempotent(rows in prop::collection::vec(row(), 1..40)) {
        let mut df = observations(&rows);
        let mut ages: Vec<Option<f64>> = rows.iter().map(|r| r.2.map(|v| v / 1e4)).collect();
        ages.rotate_left(1);
        df.with_column(Column::new("median_age".into(), ages)).unwrap();
        let config = PipelineConfig::default();

        let once = impute_covid(&df, "covid_imputed", &config).unwrap();
        let twice = impute_covid(&once, "covid_imputed", &config).unwrap();

        prop_assert!(once.equals_missing(&twice));
        prop_assert_eq!(once.column("total_cases").unwrap().null_count(), 0);
    }

    #[test]
    fn ratios_are_always_finite(
        values in prop::collection::vec(
            (
                proptest::option::of(prop_oneof![Just(0.0f64), 0.0f64..1e9]),
                proptest::option::of(prop_oneof![Just(0.0f64), 0.0f64..1e9]),
            ),
            1..30,
        )
    ) {
        let countries: Vec<&str> = values.iter().map(|_| "X").collect();
        let first: Vec<Option<f64>> = values.iter().map(|v| v.0).collect();
        let second: Vec<Option<f64>> = values.iter().map(|v| v.1).collect();
        let df = DataFrame::new(vec![
            Column::new("country".into(), countries),
            Column::new("total_cases".into(), first.clone()),
            Column::new("total_deaths".into(), second.clone()),
            Column::new("hospital_beds_per_thousand".into(), first.clone()),
            Column::new("gdp_per_capita".into(), second.clone()),
            Column::new("people_vaccinated".into(), first),
            Column::new("people_fully_vaccinated".into(), second),
        ])
        .unwrap();

        let covid = add_covid_features(&df).unwrap();
        let vaccination = add_vaccination_features(&df).unwrap();

        for (frame, name) in [
            (&covid, "death_rate"),
            (&covid, "healthcare_capacity_index"),
            (&vaccination, "vaccination_efficiency"),
        ] {
            for value in f64s(frame, name) {
                prop_assert!(value.is_some_and(f64::is_finite), "{name}: {value:?}");
            }
        }
    }
}
