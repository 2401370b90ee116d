//! Static policy tables for the pipeline.
//!
//! Which columns are required, which survive selection, how each
//! case/death column is imputed and which columns feed each model dataset
//! are data rather than code, so they live here and can be audited or
//! overridden from a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::columns::{
    COUNTRY, DATE, DEATH_RATE, GDP_PER_CAPITA, HEALTHCARE_CAPACITY_INDEX,
    HOSPITAL_BEDS_PER_THOUSAND, HUMAN_DEVELOPMENT_INDEX, LIFE_EXPECTANCY, MEDIAN_AGE, NEW_CASES,
    NEW_DEATHS, PEOPLE_FULLY_VACCINATED, PEOPLE_FULLY_VACCINATED_PER_HUNDRED, PEOPLE_VACCINATED,
    PEOPLE_VACCINATED_PER_HUNDRED, POPULATION, POPULATION_DENSITY, TOTAL_CASES,
    TOTAL_CASES_PER_MILLION, TOTAL_DEATHS, TOTAL_DEATHS_PER_MILLION, TOTAL_VACCINATIONS,
    TOTAL_VACCINATIONS_PER_HUNDRED, VACCINATION_SPEED,
};
use crate::error::Result;

/// How missing values of a column are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImputeStrategy {
    /// Count-like columns: a missing count means nothing was reported.
    Zero,
    /// Slowly varying socioeconomic columns: use the column median.
    Median,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImputeRule {
    pub column: String,
    pub strategy: ImputeStrategy,
}

impl ImputeRule {
    pub fn new(column: impl Into<String>, strategy: ImputeStrategy) -> Self {
        Self {
            column: column.into(),
            strategy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub covid_required: Vec<String>,
    pub vaccination_required: Vec<String>,
    pub covid_columns: Vec<String>,
    pub vaccination_columns: Vec<String>,
    pub covid_imputation: Vec<ImputeRule>,
    pub regression_columns: Vec<String>,
    pub classification_columns: Vec<String>,
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let zero = [
            TOTAL_CASES,
            NEW_CASES,
            TOTAL_DEATHS,
            NEW_DEATHS,
            TOTAL_CASES_PER_MILLION,
            TOTAL_DEATHS_PER_MILLION,
        ];
        let median = [
            POPULATION_DENSITY,
            MEDIAN_AGE,
            GDP_PER_CAPITA,
            HOSPITAL_BEDS_PER_THOUSAND,
            LIFE_EXPECTANCY,
            HUMAN_DEVELOPMENT_INDEX,
        ];
        let covid_imputation = zero
            .iter()
            .map(|column| ImputeRule::new(*column, ImputeStrategy::Zero))
            .chain(
                median
                    .iter()
                    .map(|column| ImputeRule::new(*column, ImputeStrategy::Median)),
            )
            .collect();
        Self {
            covid_required: names(&[COUNTRY, DATE, TOTAL_CASES]),
            vaccination_required: names(&[COUNTRY, DATE, TOTAL_VACCINATIONS]),
            covid_columns: names(&[
                COUNTRY,
                DATE,
                TOTAL_CASES,
                NEW_CASES,
                TOTAL_DEATHS,
                NEW_DEATHS,
                TOTAL_CASES_PER_MILLION,
                TOTAL_DEATHS_PER_MILLION,
                POPULATION,
                POPULATION_DENSITY,
                MEDIAN_AGE,
                GDP_PER_CAPITA,
                HOSPITAL_BEDS_PER_THOUSAND,
                LIFE_EXPECTANCY,
                HUMAN_DEVELOPMENT_INDEX,
            ]),
            vaccination_columns: names(&[
                COUNTRY,
                DATE,
                TOTAL_VACCINATIONS,
                PEOPLE_VACCINATED,
                PEOPLE_FULLY_VACCINATED,
                TOTAL_VACCINATIONS_PER_HUNDRED,
                PEOPLE_VACCINATED_PER_HUNDRED,
                PEOPLE_FULLY_VACCINATED_PER_HUNDRED,
            ]),
            covid_imputation,
            regression_columns: names(&[
                COUNTRY,
                GDP_PER_CAPITA,
                HOSPITAL_BEDS_PER_THOUSAND,
                POPULATION_DENSITY,
                MEDIAN_AGE,
                HEALTHCARE_CAPACITY_INDEX,
                PEOPLE_FULLY_VACCINATED_PER_HUNDRED,
                VACCINATION_SPEED,
            ]),
            classification_columns: names(&[
                COUNTRY,
                TOTAL_DEATHS_PER_MILLION,
                GDP_PER_CAPITA,
                HOSPITAL_BEDS_PER_THOUSAND,
                HUMAN_DEVELOPMENT_INDEX,
                DEATH_RATE,
                HEALTHCARE_CAPACITY_INDEX,
            ]),
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Case/death columns filled with zero, in rule order.
    pub fn zero_fill_columns(&self) -> Vec<&str> {
        self.columns_with(ImputeStrategy::Zero)
    }

    /// Case/death columns filled with their median, in rule order.
    pub fn median_fill_columns(&self) -> Vec<&str> {
        self.columns_with(ImputeStrategy::Median)
    }

    pub fn strategy_for(&self, column: &str) -> Option<ImputeStrategy> {
        self.covid_imputation
            .iter()
            .find(|rule| rule.column == column)
            .map(|rule| rule.strategy)
    }

    fn columns_with(&self, strategy: ImputeStrategy) -> Vec<&str> {
        self.covid_imputation
            .iter()
            .filter(|rule| rule.strategy == strategy)
            .map(|rule| rule.column.as_str())
            .collect()
    }
}
