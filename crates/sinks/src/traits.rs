//! Destination trait definitions

use std::future::Future;

use jaffle_protocol::{Batch, TableSpec};

use crate::common::{LoadRecord, SinkError, TableStats};

/// A dataset that accepts table loads
///
/// Implementations own the write disposition semantics: merge tables are
/// upserted by primary key, append tables only grow, replace tables are
/// cleared when opened.
pub trait Destination: Send + Sync {
    /// Writer for a single table within one load
    type Writer: TableWriter;

    /// Destination type name (e.g., "turso")
    fn name(&self) -> &'static str;

    /// Dataset the tables live in
    fn dataset_name(&self) -> &str;

    /// Start loading `table` as part of load `load_id`
    fn open_table(
        &self,
        table: &TableSpec,
        load_id: &str,
    ) -> impl Future<Output = Result<Self::Writer, SinkError>>;

    /// Rows currently stored in `table`, 0 if it was never loaded
    fn row_count(&self, table: &str) -> impl Future<Output = Result<u64, SinkError>>;

    /// Persist the outcome of a load
    fn record_load(&self, load: &LoadRecord) -> impl Future<Output = Result<(), SinkError>>;
}

/// Streams batches into one table; nothing is visible until `commit`
pub trait TableWriter {
    /// Table being written
    fn table(&self) -> &TableSpec;

    /// Write one batch
    fn write(&mut self, batch: &Batch) -> impl Future<Output = Result<(), SinkError>>;

    /// Make every written batch visible
    fn commit(self) -> impl Future<Output = Result<TableStats, SinkError>>;

    /// Discard every written batch
    fn rollback(self) -> impl Future<Output = Result<(), SinkError>>;
}
