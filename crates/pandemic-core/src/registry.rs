//! Named pipelines wiring the stages to catalog datasets.

use std::collections::BTreeMap;
use std::sync::Arc;

use pandemic_model::PipelineConfig;
use pandemic_model::datasets::{
    CLASSIFICATION, COVID_FEATURES, COVID_IMPUTED, COVID_RAW, COVID_SELECTED, COVID_VALIDATED,
    INTEGRATED, QUALITY_REPORT, REGRESSION, VACC_FEATURES, VACC_IMPUTED, VACC_SELECTED,
    VACCINATION_RAW, VACCINATION_VALIDATED,
};
use polars::prelude::DataFrame;

use crate::error::PipelineError;
use crate::features::build_features;
use crate::impute::{impute_covid, impute_vaccinations};
use crate::integrate::integrate;
use crate::pipeline::{Node, Pipeline};
use crate::quality::quality_report;
use crate::select::select_columns;
use crate::split::split_datasets;
use crate::validate::validate_observations;

pub const DATA_ENGINEERING: &str = "data_engineering";
pub const DATA_CLEANING: &str = "data_cleaning";
pub const DEFAULT: &str = "__default__";

fn arity(node: &str, expected: usize, inputs: &[DataFrame]) -> PipelineError {
    PipelineError::Node {
        node: node.to_string(),
        message: format!("expected {expected} inputs, got {}", inputs.len()),
    }
}

/// Validation of both raw tables plus the quality report.
pub fn data_engineering_pipeline(config: &PipelineConfig) -> Pipeline {
    let config = Arc::new(config.clone());
    let covid_config = Arc::clone(&config);
    let vacc_config = config;
    Pipeline::new(vec![
        Node::new(
            "validate_covid_data",
            &[COVID_RAW],
            &[COVID_VALIDATED],
            move |inputs| {
                let [raw] = inputs else {
                    return Err(arity("validate_covid_data", 1, inputs));
                };
                Ok(vec![validate_observations(
                    raw,
                    COVID_RAW,
                    &covid_config.covid_required,
                )?])
            },
        )
        .with_tags(&["validation", "covid"]),
        Node::new(
            "validate_vaccination_data",
            &[VACCINATION_RAW],
            &[VACCINATION_VALIDATED],
            move |inputs| {
                let [raw] = inputs else {
                    return Err(arity("validate_vaccination_data", 1, inputs));
                };
                Ok(vec![validate_observations(
                    raw,
                    VACCINATION_RAW,
                    &vacc_config.vaccination_required,
                )?])
            },
        )
        .with_tags(&["validation", "vaccination"]),
        Node::new(
            "generate_quality_report",
            &[COVID_VALIDATED, VACCINATION_VALIDATED],
            &[QUALITY_REPORT],
            |inputs| {
                let [covid, vaccination] = inputs else {
                    return Err(arity("generate_quality_report", 2, inputs));
                };
                Ok(vec![quality_report(covid, vaccination)?])
            },
        )
        .with_tags(&["reporting", "quality"]),
    ])
}

/// Selection, imputation, features, integration and the model datasets.
pub fn data_cleaning_pipeline(config: &PipelineConfig) -> Pipeline {
    let config = Arc::new(config.clone());
    let select_config = Arc::clone(&config);
    let impute_config = Arc::clone(&config);
    let split_config = config;
    Pipeline::new(vec![
        Node::new(
            "select_columns",
            &[COVID_VALIDATED, VACCINATION_VALIDATED],
            &[COVID_SELECTED, VACC_SELECTED],
            move |inputs| {
                let [covid, vaccination] = inputs else {
                    return Err(arity("select_columns", 2, inputs));
                };
                Ok(vec![
                    select_columns(covid, COVID_SELECTED, &select_config.covid_columns)?,
                    select_columns(
                        vaccination,
                        VACC_SELECTED,
                        &select_config.vaccination_columns,
                    )?,
                ])
            },
        )
        .with_tags(&["cleaning"]),
        Node::new(
            "impute_missing",
            &[COVID_SELECTED, VACC_SELECTED],
            &[COVID_IMPUTED, VACC_IMPUTED],
            move |inputs| {
                let [covid, vaccination] = inputs else {
                    return Err(arity("impute_missing", 2, inputs));
                };
                Ok(vec![
                    impute_covid(covid, COVID_IMPUTED, &impute_config)?,
                    impute_vaccinations(vaccination, VACC_IMPUTED)?,
                ])
            },
        )
        .with_tags(&["cleaning"]),
        Node::new(
            "create_features",
            &[COVID_IMPUTED, VACC_IMPUTED],
            &[COVID_FEATURES, VACC_FEATURES],
            |inputs| {
                let [covid, vaccination] = inputs else {
                    return Err(arity("create_features", 2, inputs));
                };
                let (covid, vaccination) = build_features(covid, vaccination)?;
                Ok(vec![covid, vaccination])
            },
        )
        .with_tags(&["feature_engineering"]),
        Node::new(
            "integrate_datasets",
            &[COVID_FEATURES, VACC_FEATURES],
            &[INTEGRATED],
            |inputs| {
                let [covid, vaccination] = inputs else {
                    return Err(arity("integrate_datasets", 2, inputs));
                };
                Ok(vec![integrate(covid, vaccination)?])
            },
        )
        .with_tags(&["integration"]),
        Node::new(
            "create_ml_datasets",
            &[INTEGRATED],
            &[REGRESSION, CLASSIFICATION],
            move |inputs| {
                let [integrated] = inputs else {
                    return Err(arity("create_ml_datasets", 1, inputs));
                };
                let (regression, classification) = split_datasets(integrated, &split_config)?;
                Ok(vec![regression, classification])
            },
        )
        .with_tags(&["ml_prep"]),
    ])
}

/// Every registered pipeline by name; `__default__` runs both halves.
pub fn register_pipelines(config: &PipelineConfig) -> BTreeMap<String, Pipeline> {
    let engineering = data_engineering_pipeline(config);
    let cleaning = data_cleaning_pipeline(config);
    let mut pipelines = BTreeMap::new();
    pipelines.insert(
        DEFAULT.to_string(),
        engineering.clone().combine(cleaning.clone()),
    );
    pipelines.insert(DATA_ENGINEERING.to_string(), engineering);
    pipelines.insert(DATA_CLEANING.to_string(), cleaning);
    pipelines
}
