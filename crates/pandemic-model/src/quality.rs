use serde::{Deserialize, Serialize};

/// Summary statistics for one validated source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRecord {
    pub dataset: String,
    pub n_rows: usize,
    pub n_columns: usize,
    pub n_countries: usize,
    /// Earliest observation date (ISO `YYYY-MM-DD`), if any date is present.
    pub date_min: Option<String>,
    pub date_max: Option<String>,
    /// Share of missing cells over rows x columns, in percent, 2 decimals.
    pub missing_data_pct: f64,
}

impl QualityRecord {
    pub fn date_range(&self) -> String {
        match (&self.date_min, &self.date_max) {
            (Some(min), Some(max)) => format!("{min} to {max}"),
            _ => "-".to_string(),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.n_rows * self.n_columns
    }
}
