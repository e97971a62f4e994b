//! Pipeline - extract each resource into its destination table

use chrono::{DateTime, Utc};
use jaffle_config::{PipelineConfig, ProgressMode};
use jaffle_connectors::{ResourceExtractor, Source};
use jaffle_sinks::{Destination, LoadRecord, LoadStatus, TableWriter};
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::load_info::{LoadInfo, TableLoadInfo};
use crate::trace::PipelineTrace;

/// Identifier for a load started at `at`: `{unix_seconds}.{micros}`
pub fn new_load_id(at: DateTime<Utc>) -> String {
    format!("{}.{:06}", at.timestamp(), at.timestamp_subsec_micros())
}

/// Loads sources into one destination
pub struct Pipeline<D: Destination> {
    config: PipelineConfig,
    destination: D,
    last_trace: Option<PipelineTrace>,
}

impl<D: Destination> Pipeline<D> {
    pub fn new(config: PipelineConfig, destination: D) -> Self {
        Self {
            config,
            destination,
            last_trace: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    /// Trace of the most recent run, successful or not
    pub fn last_trace(&self) -> Option<&PipelineTrace> {
        self.last_trace.as_ref()
    }

    /// Extract every resource of `source` and load it
    ///
    /// Resources are loaded in order, each in its own table transaction. The
    /// load is recorded in the destination with status `completed` or
    /// `failed` before returning.
    ///
    /// # Errors
    ///
    /// Returns the first destination error. Extraction errors are not errors
    /// here: the extractor has already turned them into a placeholder batch
    /// or a truncated result.
    pub async fn run(&mut self, source: &mut Source) -> Result<LoadInfo> {
        let started_at = Utc::now();
        let load_id = new_load_id(started_at);

        info!(
            pipeline = %self.config.name,
            source = %source.name(),
            destination = %self.destination.name(),
            dataset = %self.destination.dataset_name(),
            load_id = %load_id,
            "Starting load"
        );

        let mut tables = Vec::with_capacity(source.resources().len());
        let mut outcome = Ok(());
        for resource in source.resources_mut() {
            match self.load_resource(resource, &load_id).await {
                Ok(table) => tables.push(table),
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }

        let finished_at = Utc::now();
        let status = if outcome.is_ok() {
            LoadStatus::Completed
        } else {
            LoadStatus::Failed
        };
        let recorded = self
            .destination
            .record_load(&LoadRecord {
                load_id: load_id.clone(),
                pipeline_name: self.config.name.clone(),
                dataset_name: self.destination.dataset_name().to_string(),
                status,
                inserted_at: finished_at.to_rfc3339(),
            })
            .await
            .map_err(PipelineError::RecordLoad);

        let outcome = outcome.and(recorded);
        self.last_trace = Some(PipelineTrace {
            pipeline_name: self.config.name.clone(),
            load_id: load_id.clone(),
            started_at,
            finished_at,
            extractions: source.extraction_results(),
            error: outcome.as_ref().err().map(ToString::to_string),
        });
        outcome?;

        Ok(LoadInfo {
            pipeline_name: self.config.name.clone(),
            destination: self.destination.name().to_string(),
            dataset_name: self.destination.dataset_name().to_string(),
            load_id,
            tables,
        })
    }

    async fn load_resource(
        &self,
        resource: &mut ResourceExtractor,
        load_id: &str,
    ) -> Result<TableLoadInfo> {
        let table = resource.table().clone();
        let name = table.name().to_string();

        let mut writer = self
            .destination
            .open_table(&table, load_id)
            .await
            .map_err(|e| PipelineError::destination(&name, e))?;

        let mut received = 0u64;
        while let Some(batch) = resource.next_batch().await {
            let written = writer.write(&batch).await;
            if let Err(e) = written {
                if let Err(rollback_err) = writer.rollback().await {
                    warn!(table = %name, error = %rollback_err, "Rollback failed");
                }
                return Err(PipelineError::destination(&name, e));
            }

            received += batch.len() as u64;
            match self.config.progress {
                ProgressMode::Log => info!(
                    table = %name,
                    batch = batch.len(),
                    total = received,
                    "Loaded batch"
                ),
                ProgressMode::None => debug!(
                    table = %name,
                    batch = batch.len(),
                    total = received,
                    "Loaded batch"
                ),
            }
        }

        let stats = writer
            .commit()
            .await
            .map_err(|e| PipelineError::destination(&name, e))?;
        let row_count_after = self
            .destination
            .row_count(&name)
            .await
            .map_err(|e| PipelineError::destination(&name, e))?;

        Ok(TableLoadInfo {
            table: name,
            rows_received: stats.rows_received,
            rows_merged: stats.rows_written(),
            rows_rejected: stats.rows_rejected,
            row_count_after,
        })
    }
}
