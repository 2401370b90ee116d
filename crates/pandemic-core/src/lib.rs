pub mod data_utils;
pub mod error;
pub mod features;
pub mod frame_utils;
pub mod impute;
pub mod integrate;
pub mod pipeline;
pub mod quality;
pub mod registry;
pub mod select;
pub mod split;
pub mod validate;

pub use data_utils::{any_to_f64, any_to_string, column_f64_values, missing_cell_count};
pub use error::{PipelineError, Result};
pub use features::{add_covid_features, add_vaccination_features, build_features};
pub use frame_utils::{CountryKey, DateKey, ObservationKey};
pub use impute::{impute, impute_covid, impute_vaccinations, median};
pub use integrate::{integrate, latest_per_country};
pub use pipeline::{DatasetShape, DatasetStore, Node, NodeRun, Pipeline, RunReport};
pub use quality::{quality_record, quality_records, quality_report, records_to_frame};
pub use registry::{
    DATA_CLEANING, DATA_ENGINEERING, DEFAULT, data_cleaning_pipeline, data_engineering_pipeline,
    register_pipelines,
};
pub use select::select_columns;
pub use split::{model_dataset, split_datasets};
pub use validate::validate_observations;
