use std::fs;
use std::path::Path;

use polars::prelude::{Column, DataFrame, DataType};
use tempfile::TempDir;

use pandemic_core::data_utils::missing_cell_count;
use pandemic_core::{DatasetStore, impute_vaccinations};
use pandemic_ingest::DataCatalog;
use pandemic_model::datasets::{
    COVID_RAW, COVID_SELECTED, INTEGRATED, QUALITY_REPORT, REGRESSION, VACCINATION_RAW,
};

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
    fs::write(path, contents).expect("write file");
}

#[test]
fn dataset_names_map_to_layered_paths() {
    let catalog = DataCatalog::new("data");

    assert_eq!(
        catalog.path_for(COVID_RAW),
        Path::new("data/01_raw/covid_compact.csv")
    );
    assert_eq!(
        catalog.path_for(VACCINATION_RAW),
        Path::new("data/01_raw/vaccination_global.csv")
    );
    assert_eq!(
        catalog.path_for(COVID_SELECTED),
        Path::new("data/02_intermediate/covid_selected.csv")
    );
    assert_eq!(
        catalog.path_for(INTEGRATED),
        Path::new("data/03_primary/integrated_data.csv")
    );
    assert_eq!(
        catalog.path_for(REGRESSION),
        Path::new("data/05_model_input/regression_data.csv")
    );
    assert_eq!(
        catalog.path_for(QUALITY_REPORT),
        Path::new("data/08_reporting/eda_summary_stats.csv")
    );
}

#[test]
fn raw_csv_loads_with_parsed_dates() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = DataCatalog::new(dir.path());
    write_file(
        &catalog.path_for(COVID_RAW),
        "country,date,total_cases\nChile,2021-01-01,10\nChile,2021-01-02,\n",
    );

    let df = catalog.load(COVID_RAW).expect("load");

    assert_eq!(df.height(), 2);
    assert_eq!(df.column("date").expect("date").dtype(), &DataType::Date);
    assert_eq!(df.column("total_cases").expect("cases").null_count(), 1);
}

#[test]
fn missing_file_is_an_error_naming_the_dataset() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = DataCatalog::new(dir.path());

    let err = catalog.load(VACCINATION_RAW).unwrap_err();

    assert!(format!("{err:#}").contains(VACCINATION_RAW), "{err:#}");
    assert!(!catalog.exists(VACCINATION_RAW));
}

#[test]
fn saved_frames_round_trip_through_disk() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = DataCatalog::new(dir.path());
    let mut df = DataFrame::new(vec![
        Column::new("country".into(), ["A", "B"]),
        Column::new("death_rate".into(), [Some(8.5), None]),
    ])
    .expect("df");

    let path = catalog.save(REGRESSION, &mut df).expect("save");
    let loaded = catalog.load(REGRESSION).expect("load");

    assert!(path.ends_with("05_model_input/regression_data.csv"));
    assert_eq!(loaded.shape(), (2, 2));
    assert_eq!(loaded.column("death_rate").expect("rate").null_count(), 1);
}

#[test]
fn store_round_trip_loads_inputs_and_saves_outputs() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = DataCatalog::new(dir.path());
    write_file(
        &catalog.path_for(COVID_RAW),
        "country,date,total_cases\nA,2021-01-01,1\n",
    );
    write_file(
        &catalog.path_for(VACCINATION_RAW),
        "country,date,total_vaccinations\nA,2021-01-01,5\n",
    );

    let mut store = DatasetStore::new();
    catalog
        .load_into(&mut store, &[COVID_RAW, VACCINATION_RAW])
        .expect("load into");
    let covid = store.require(COVID_RAW).expect("covid").clone();
    store.insert(INTEGRATED, covid);
    let written = catalog
        .save_from(&store, &[INTEGRATED, QUALITY_REPORT])
        .expect("save from");

    assert_eq!(store.len(), 3);
    assert_eq!(written, vec![catalog.path_for(INTEGRATED)]);
    assert!(catalog.exists(INTEGRATED));
}

#[test]
fn empty_measure_column_is_zero_filled_after_load() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = DataCatalog::new(dir.path());
    write_file(
        &catalog.path_for(VACCINATION_RAW),
        "country,date,total_vaccinations,people_vaccinated\n\
         Chile,2021-02-01,100,\n\
         Spain,2021-02-01,,\n",
    );

    let df = catalog.load(VACCINATION_RAW).expect("load");
    let imputed = impute_vaccinations(&df, "vacc_imputed").expect("impute");

    assert_eq!(missing_cell_count(&imputed), 0);
    assert_eq!(
        imputed.column("people_vaccinated").expect("people").dtype(),
        &DataType::Float64
    );
}
