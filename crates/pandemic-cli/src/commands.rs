use anyhow::Result;
use pandemic_cli::pipeline::{RunOptions, RunOutcome, load_config, run_pipeline};
use pandemic_core::register_pipelines;
use pandemic_ingest::{DataCatalog, DoctorReport, run_doctor};
use tracing::info_span;

use crate::cli::{ConfigArgs, DoctorArgs, RunArgs};
use crate::summary::print_pipelines;

pub fn run_run(args: &RunArgs) -> Result<RunOutcome> {
    let options = RunOptions {
        data_dir: args.data_dir.clone(),
        pipeline: args.pipeline.clone(),
        tags: args.tags.clone(),
        config: args.config.clone(),
        dry_run: args.dry_run,
    };
    run_pipeline(&options)
}

pub fn run_doctor_command(args: &DoctorArgs) -> Result<DoctorReport> {
    let span = info_span!("doctor", data_dir = %args.data_dir.display());
    let _guard = span.enter();
    Ok(run_doctor(&DataCatalog::new(&args.data_dir)))
}

pub fn run_pipelines() -> Result<()> {
    let pipelines = register_pipelines(&load_config(None)?);
    print_pipelines(
        pipelines
            .iter()
            .map(|(name, pipeline)| (name.as_str(), pipeline.node_names())),
    );
    Ok(())
}

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    println!("{}", config.to_json_pretty()?);
    Ok(())
}
