//! Run command - load the Jaffle Shop resources once

use std::process::ExitCode;

use anyhow::{Context, Result};
use jaffle_config::{Config, DestinationConfig};
use jaffle_connectors::JaffleShopConfig;
use jaffle_pipeline::Runner;
use jaffle_sinks::TursoDestination;

/// Run the pipeline; exit code 0 on success, 1 on failure
pub async fn run(config: &Config) -> Result<ExitCode> {
    let source_config =
        JaffleShopConfig::from_toml(&config.source).context("invalid [source] configuration")?;
    let destination = open_destination(&config.destination, &config.pipeline.dataset_name)
        .await
        .context("failed to open destination")?;

    tracing::info!(
        pipeline = %config.pipeline.name,
        base_url = %source_config.base_url,
        dataset = %config.pipeline.dataset_name,
        "running pipeline"
    );

    let mut runner = Runner::new(config.pipeline.clone(), source_config, destination);
    if runner.run().await {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Open the dataset on disk, or in memory when configured so
pub async fn open_destination(
    config: &DestinationConfig,
    dataset_name: &str,
) -> jaffle_sinks::Result<TursoDestination> {
    match config.data_dir.as_deref() {
        Some(data_dir) if !config.in_memory => TursoDestination::open(data_dir, dataset_name).await,
        _ => TursoDestination::memory(dataset_name).await,
    }
}
