use std::fs;

use polars::prelude::{Column, DataFrame};
use tempfile::TempDir;

use pandemic_ingest::doctor::top_missing_columns;
use pandemic_ingest::{DataCatalog, run_doctor};
use pandemic_model::datasets::{COVID_RAW, VACCINATION_RAW};

fn catalog_with(covid: Option<&str>, vaccination: Option<&str>) -> (TempDir, DataCatalog) {
    let dir = TempDir::new().expect("tempdir");
    let catalog = DataCatalog::new(dir.path());
    for (name, contents) in [(COVID_RAW, covid), (VACCINATION_RAW, vaccination)] {
        if let Some(contents) = contents {
            let path = catalog.path_for(name);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(path, contents).expect("write");
        }
    }
    (dir, catalog)
}

#[test]
fn absent_files_fail_the_check() {
    let (_dir, catalog) = catalog_with(None, None);

    let report = run_doctor(&catalog);

    assert!(!report.passed());
    assert_eq!(report.datasets.len(), 2);
    assert!(report.datasets.iter().all(|check| !check.exists));
}

#[test]
fn complete_files_pass_and_are_described() {
    let (_dir, catalog) = catalog_with(
        Some(
            "country,date,total_cases,new_cases,total_deaths\n\
             Chile,2021-01-01,10,1,\n\
             Peru,2021-01-03,20,2,1\n",
        ),
        Some(
            "country,date,total_vaccinations,people_vaccinated\n\
             Chile,2021-02-01,100,80\n",
        ),
    );

    let report = run_doctor(&catalog);

    assert!(report.passed(), "{report:?}");
    let covid = &report.datasets[0];
    assert_eq!(covid.dataset, COVID_RAW);
    assert_eq!(covid.sampled_rows, 2);
    assert_eq!(covid.columns, 5);
    assert_eq!(covid.n_countries, 2);
    assert_eq!(covid.date_min.as_deref(), Some("2021-01-01"));
    assert_eq!(covid.date_max.as_deref(), Some("2021-01-03"));
    assert_eq!(covid.top_missing.len(), 1);
    assert_eq!(covid.top_missing[0].column, "total_deaths");
    assert_eq!(covid.top_missing[0].missing_pct, 50.0);

    let json = serde_json::to_value(&report).expect("json");
    assert_eq!(json["schema"], "pandemic-prep.doctor");
}

#[test]
fn missing_required_columns_are_listed() {
    let (_dir, catalog) = catalog_with(
        Some("country,date,total_cases\nChile,2021-01-01,10\n"),
        Some("country,date,total_vaccinations,people_vaccinated\nChile,2021-02-01,1,1\n"),
    );

    let report = run_doctor(&catalog);

    assert!(!report.passed());
    assert_eq!(
        report.datasets[0].missing_required,
        vec!["new_cases".to_string(), "total_deaths".to_string()]
    );
    assert!(report.datasets[1].passed());
}

#[test]
fn missing_columns_rank_by_percentage() {
    let df = DataFrame::new(vec![
        Column::new("a".into(), [Some(1), None, None, None]),
        Column::new("b".into(), [Some(1), Some(2), Some(3), Some(4)]),
        Column::new("c".into(), [None, Some(2), Some(3), Some(4)]),
        Column::new("d".into(), [None, None, Some(3), Some(4)]),
    ])
    .expect("df");

    let top = top_missing_columns(&df, 2);

    insta::assert_json_snapshot!(top, @r#"
    [
      {
        "column": "a",
        "missing_pct": 75.0
      },
      {
        "column": "d",
        "missing_pct": 50.0
      }
    ]
    "#);
}
