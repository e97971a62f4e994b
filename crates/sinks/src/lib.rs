//! Jaffle - Sinks
//!
//! Destinations that persist extracted batches into a dataset.
//!
//! # Architecture
//!
//! The pipeline opens one `TableWriter` per resource, streams that resource's
//! batches into it, and commits. A write error rolls the table back; tables
//! committed earlier in the same load stay committed.
//!
//! ```text
//! [Extractor] --Batch--> [TableWriter] --commit--> [Dataset table]
//! ```
//!
//! # Available Destinations
//!
//! | Destination | Storage |
//! |-------------|---------|
//! | `turso` | Embedded SQLite-compatible database, one file per dataset |
//!
//! # Example
//!
//! ```ignore
//! use jaffle_sinks::{Destination, TableWriter, TursoDestination};
//!
//! let destination = TursoDestination::open("data", "jaffle_shop_data").await?;
//! let mut writer = destination.open_table(&table, &load_id).await?;
//! writer.write(&batch).await?;
//! let stats = writer.commit().await?;
//! ```

/// Column type inference for loaded records
pub mod schema;

/// Turso destination - merge-upsert into an embedded database
pub mod turso;

mod common;
mod traits;

pub use common::{LoadRecord, LoadStatus, SinkError, TableStats};
pub use schema::{ColumnType, TableSchema};
pub use traits::{Destination, TableWriter};
pub use turso::{TursoDestination, TursoTableWriter};

/// Result type for sink operations
pub type Result<T> = std::result::Result<T, SinkError>;
