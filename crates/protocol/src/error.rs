//! Protocol error types

use thiserror::Error;

/// Errors that can occur when building protocol types
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Table name cannot be used as a destination identifier
    #[error("invalid table name '{0}': use ASCII letters, digits and underscores")]
    InvalidTableName(String),

    /// Merge disposition declared without any key column
    #[error("table '{0}' uses merge but declares no primary key")]
    MissingPrimaryKey(String),
}
