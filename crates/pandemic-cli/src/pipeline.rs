//! Catalog-backed execution of a registered pipeline.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use pandemic_core::{DEFAULT, DatasetStore, Pipeline, RunReport, register_pipelines};
use pandemic_ingest::DataCatalog;
use pandemic_model::PipelineConfig;
use pandemic_model::datasets::QUALITY_REPORT;
use polars::prelude::DataFrame;
use tracing::{info, info_span};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub data_dir: PathBuf,
    pub pipeline: String,
    /// Restrict the run to nodes carrying any of these tags.
    pub tags: Vec<String>,
    pub config: Option<PathBuf>,
    /// Run every node but write nothing.
    pub dry_run: bool,
}

impl RunOptions {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            pipeline: DEFAULT.to_string(),
            tags: Vec::new(),
            config: None,
            dry_run: false,
        }
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub pipeline: String,
    pub report: RunReport,
    pub written: Vec<PathBuf>,
    pub quality: Option<DataFrame>,
    pub elapsed_ms: u128,
}

/// Configuration from `path`, or the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

/// Look up a registered pipeline and apply the tag filter.
pub fn select_pipeline(config: &PipelineConfig, name: &str, tags: &[String]) -> Result<Pipeline> {
    let mut pipelines = register_pipelines(config);
    let Some(pipeline) = pipelines.remove(name) else {
        let known: Vec<String> = pipelines.into_keys().collect();
        bail!("unknown pipeline {name}; expected one of: {}", known.join(", "));
    };
    if tags.is_empty() {
        return Ok(pipeline);
    }
    let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
    let filtered = pipeline.only_tags(&tags);
    if filtered.is_empty() {
        bail!("no node of pipeline {name} carries tags: {}", tags.join(", "));
    }
    Ok(filtered)
}

/// Load free inputs from the catalog, run, and persist every produced dataset.
pub fn run_pipeline(options: &RunOptions) -> Result<RunOutcome> {
    let span = info_span!("run", pipeline = %options.pipeline);
    let _guard = span.enter();
    let start = Instant::now();

    let config = load_config(options.config.as_deref())?;
    let pipeline = select_pipeline(&config, &options.pipeline, &options.tags)?;
    let catalog = DataCatalog::new(&options.data_dir);
    info!(
        nodes = pipeline.nodes().len(),
        data_dir = %options.data_dir.display(),
        dry_run = options.dry_run,
        "starting pipeline"
    );

    let mut store = DatasetStore::new();
    catalog.load_into(&mut store, &pipeline.free_inputs())?;
    let report = pipeline
        .run(&mut store)
        .with_context(|| format!("pipeline {} failed", options.pipeline))?;

    let written = if options.dry_run {
        Vec::new()
    } else {
        catalog.save_from(&store, &pipeline.outputs())?
    };
    let elapsed_ms = start.elapsed().as_millis();
    info!(written = written.len(), elapsed_ms, "pipeline finished");

    Ok(RunOutcome {
        pipeline: options.pipeline.clone(),
        report,
        written,
        quality: store.get(QUALITY_REPORT).cloned(),
        elapsed_ms,
    })
}
