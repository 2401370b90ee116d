//! File-backed catalog mapping dataset names to CSV files under a data directory.
//!
//! ```text
//! data/
//!   01_raw/            covid_compact.csv, vaccination_global.csv
//!   02_intermediate/   validated, selected and imputed tables
//!   03_primary/        integrated_data.csv
//!   04_feature/        covid_features.csv, vacc_features.csv
//!   05_model_input/    regression_data.csv, classification_data.csv
//!   08_reporting/      eda_summary_stats.csv
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pandemic_core::DatasetStore;
use pandemic_model::datasets::{
    CLASSIFICATION, COVID_FEATURES, COVID_RAW, INTEGRATED, QUALITY_REPORT, REGRESSION,
    VACC_FEATURES, VACCINATION_RAW,
};
use polars::prelude::DataFrame;
use tracing::{debug, info};

use crate::csv_io::{read_csv, write_csv};

#[derive(Debug, Clone)]
pub struct DataCatalog {
    root: PathBuf,
}

impl DataCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a dataset; unknown names land in the intermediate layer.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let relative = match name {
            COVID_RAW => "01_raw/covid_compact.csv".to_string(),
            VACCINATION_RAW => "01_raw/vaccination_global.csv".to_string(),
            INTEGRATED => format!("03_primary/{name}.csv"),
            COVID_FEATURES | VACC_FEATURES => format!("04_feature/{name}.csv"),
            REGRESSION | CLASSIFICATION => format!("05_model_input/{name}.csv"),
            QUALITY_REPORT => format!("08_reporting/{name}.csv"),
            _ => format!("02_intermediate/{name}.csv"),
        };
        self.root.join(relative)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    pub fn load(&self, name: &str) -> Result<DataFrame> {
        let path = self.path_for(name);
        let df = read_csv(&path).with_context(|| format!("Failed to load dataset {name}"))?;
        debug!(
            dataset = name,
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded dataset"
        );
        Ok(df)
    }

    pub fn save(&self, name: &str, df: &mut DataFrame) -> Result<PathBuf> {
        let path = self.path_for(name);
        write_csv(&path, df).with_context(|| format!("Failed to save dataset {name}"))?;
        debug!(dataset = name, path = %path.display(), rows = df.height(), "saved dataset");
        Ok(path)
    }

    /// Load each named dataset into `store`.
    pub fn load_into(&self, store: &mut DatasetStore, names: &[&str]) -> Result<()> {
        for name in names {
            store.insert(*name, self.load(name)?);
        }
        info!(datasets = names.len(), "catalog inputs loaded");
        Ok(())
    }

    /// Persist the named datasets present in `store`; returns the written paths.
    pub fn save_from(&self, store: &DatasetStore, names: &[&str]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(names.len());
        for name in names {
            let Some(frame) = store.get(name) else {
                continue;
            };
            let mut frame = frame.clone();
            written.push(self.save(name, &mut frame)?);
        }
        info!(datasets = written.len(), root = %self.root.display(), "catalog outputs saved");
        Ok(written)
    }
}
