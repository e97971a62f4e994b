//! Run trace
//!
//! Timestamps and per-resource extraction outcomes of the most recent run,
//! kept whether the run succeeded or not.

use std::fmt;

use chrono::{DateTime, Utc};
use jaffle_connectors::ExtractionResult;

/// What happened during one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTrace {
    pub pipeline_name: String,
    pub load_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub extractions: Vec<ExtractionResult>,
    /// Set when the run returned an error
    pub error: Option<String>,
}

impl PipelineTrace {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Resources that ended on an extraction error
    pub fn degraded_resources(&self) -> Vec<&str> {
        self.extractions
            .iter()
            .filter(|e| e.status.is_error())
            .map(|e| e.resource.as_str())
            .collect()
    }
}

impl fmt::Display for PipelineTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match &self.error {
            None => "succeeded".to_string(),
            Some(e) => format!("failed ({})", e),
        };
        write!(
            f,
            "Run {} of {} {} in {} ms",
            self.load_id,
            self.pipeline_name,
            outcome,
            self.duration().num_milliseconds()
        )?;
        for extraction in &self.extractions {
            write!(f, "\n  {}", extraction)?;
        }
        Ok(())
    }
}
