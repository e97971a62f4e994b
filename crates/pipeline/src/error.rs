//! Pipeline error types

use jaffle_connectors::ConnectorError;
use jaffle_sinks::SinkError;
use thiserror::Error;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source could not be built
    #[error("source error: {0}")]
    Source(#[from] ConnectorError),

    /// Loading a table failed; the table was rolled back
    #[error("failed to load table '{table}': {source}")]
    Destination {
        table: String,
        #[source]
        source: SinkError,
    },

    /// The load itself could not be recorded
    #[error("failed to record load: {0}")]
    RecordLoad(#[source] SinkError),
}

impl PipelineError {
    pub(crate) fn destination(table: &str, source: SinkError) -> Self {
        Self::Destination {
            table: table.to_string(),
            source,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
