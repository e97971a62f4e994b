//! Common types shared by destinations

use std::fmt;

use thiserror::Error;

/// Row counters for one table within one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Records handed to the writer
    pub rows_received: u64,
    /// Rows whose key was not present before
    pub rows_inserted: u64,
    /// Rows that replaced an existing row with the same key
    pub rows_updated: u64,
    /// Records skipped because a key column was missing or null
    pub rows_rejected: u64,
}

impl TableStats {
    /// Rows that reached the table
    pub fn rows_written(&self) -> u64 {
        self.rows_inserted + self.rows_updated
    }
}

/// Final state of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Completed,
    Failed,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parse a stored status, unknown values read as failed
    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookkeeping row written once per load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRecord {
    pub load_id: String,
    pub pipeline_name: String,
    pub dataset_name: String,
    pub status: LoadStatus,
    /// RFC 3339 timestamp
    pub inserted_at: String,
}

/// Common sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// Destination could not be opened
    #[error("failed to initialize destination: {0}")]
    Init(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] ::turso::Error),

    /// Record or stored row could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Table name is not a valid identifier
    #[error("invalid table name: '{0}'")]
    InvalidTable(String),

    /// I/O error
    #[error("I/O error for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SinkError {
    /// Create an initialization error
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_written() {
        let stats = TableStats {
            rows_received: 10,
            rows_inserted: 6,
            rows_updated: 3,
            rows_rejected: 1,
        };
        assert_eq!(stats.rows_written(), 9);
    }

    #[test]
    fn test_load_status_round_trip() {
        assert_eq!(LoadStatus::parse(LoadStatus::Completed.as_str()), LoadStatus::Completed);
        assert_eq!(LoadStatus::parse("failed"), LoadStatus::Failed);
        assert_eq!(LoadStatus::parse("garbage"), LoadStatus::Failed);
    }

    #[test]
    fn test_error_display() {
        let err = SinkError::init("no space left");
        assert!(err.to_string().contains("no space left"));

        let err = SinkError::Io {
            path: "data".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("data"));

        let err = SinkError::InvalidTable("bad name".into());
        assert_eq!(err.to_string(), "invalid table name: 'bad name'");
    }
}
