//! Runner - one-shot pipeline execution with a pass/fail result

use jaffle_config::PipelineConfig;
use jaffle_connectors::{JaffleShopConfig, jaffle_shop_source};
use jaffle_sinks::Destination;
use tracing::{error, info};

use crate::error::Result;
use crate::load_info::LoadInfo;
use crate::pipeline::Pipeline;

/// Builds the Jaffle Shop source and runs it through a pipeline
pub struct Runner<D: Destination> {
    source_config: JaffleShopConfig,
    pipeline: Pipeline<D>,
}

impl<D: Destination> Runner<D> {
    pub fn new(
        pipeline_config: PipelineConfig,
        source_config: JaffleShopConfig,
        destination: D,
    ) -> Self {
        Self {
            source_config,
            pipeline: Pipeline::new(pipeline_config, destination),
        }
    }

    pub fn pipeline(&self) -> &Pipeline<D> {
        &self.pipeline
    }

    /// Run once, logging the outcome
    ///
    /// Returns `true` when the load completed. Every error is logged here and
    /// reported as `false`; nothing propagates.
    pub async fn run(&mut self) -> bool {
        match self.try_run().await {
            Ok(load_info) => {
                info!(load_id = %load_info.load_id, "Pipeline completed successfully!");
                info!("{}", load_info);
                if let Some(trace) = self.pipeline.last_trace() {
                    info!("{}", trace);
                }
                true
            }
            Err(e) => {
                error!(error = %e, "Pipeline failed with error: {}", e);
                false
            }
        }
    }

    async fn try_run(&mut self) -> Result<LoadInfo> {
        let mut source = jaffle_shop_source(&self.source_config)?;
        self.pipeline.run(&mut source).await
    }
}
