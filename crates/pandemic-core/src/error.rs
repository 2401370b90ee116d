use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A table failed a validation boundary: it is empty or lacks required columns.
    #[error("schema error in {dataset}: {message}")]
    Schema { dataset: String, message: String },
    #[error("dataset not available: {0}")]
    MissingDataset(String),
    #[error("invalid pipeline graph: {0}")]
    Graph(String),
    #[error("node {node} failed: {message}")]
    Node { node: String, message: String },
    #[error("frame error: {0}")]
    Polars(#[from] PolarsError),
}

impl PipelineError {
    pub fn schema(dataset: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            dataset: dataset.into(),
            message: message.into(),
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
