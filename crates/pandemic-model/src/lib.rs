pub mod columns;
pub mod config;
pub mod datasets;
pub mod error;
pub mod quality;

pub use config::{ImputeRule, ImputeStrategy, PipelineConfig};
pub use error::{ModelError, Result};
pub use quality::QualityRecord;
