//! Transactional table writer

use std::collections::BTreeSet;

use jaffle_protocol::{Batch, Record, TableSpec, WriteDisposition};
use serde_json::Value;
use tracing::{debug, info, warn};
use turso::Connection;

use super::quote_ident;
use crate::Result;
use crate::common::{SinkError, TableStats};
use crate::schema::TableSchema;
use crate::traits::TableWriter;

/// Writes one table inside an open transaction
pub struct TursoTableWriter {
    conn: Connection,
    table: TableSpec,
    load_id: String,
    schema: TableSchema,
    /// Columns added or widened during this load
    dirty_columns: BTreeSet<String>,
    stats: TableStats,
    seq: u64,
    delete_sql: String,
    insert_sql: String,
}

impl TursoTableWriter {
    pub(super) async fn begin(
        conn: Connection,
        table: TableSpec,
        load_id: &str,
        schema: TableSchema,
    ) -> Result<Self> {
        let quoted = quote_ident(table.name());

        conn.execute("BEGIN", ()).await?;
        if table.write_disposition() == WriteDisposition::Replace {
            let cleared = conn.execute(&format!("DELETE FROM {}", quoted), ()).await?;
            debug!(table = %table.name(), rows = cleared, "Cleared table for replace");
        }

        Ok(Self {
            conn,
            delete_sql: format!("DELETE FROM {} WHERE id = ?1", quoted),
            insert_sql: format!("INSERT INTO {} (id, data, _load_id) VALUES (?1, ?2, ?3)", quoted),
            table,
            load_id: load_id.to_string(),
            schema,
            dirty_columns: BTreeSet::new(),
            stats: TableStats::default(),
            seq: 0,
        })
    }

    /// Row key for a record, `None` when a key column is missing or null
    fn row_key(&mut self, record: &Record) -> Result<Option<String>> {
        let keyed = self.table.write_disposition() != WriteDisposition::Append
            && !self.table.primary_key().is_empty();

        if !keyed {
            let key = format!("{}:{}", self.load_id, self.seq);
            self.seq += 1;
            return Ok(Some(key));
        }

        Ok(primary_key_value(record, self.table.primary_key())
            .map(|value| serde_json::to_string(&value))
            .transpose()?)
    }

    async fn write_record(&mut self, record: &Record) -> Result<()> {
        self.stats.rows_received += 1;

        let Some(key) = self.row_key(record)? else {
            self.stats.rows_rejected += 1;
            debug!(table = %self.table.name(), "Skipping record without primary key");
            return Ok(());
        };
        let data = serde_json::to_string(record)?;

        let replaced = if self.table.write_disposition() == WriteDisposition::Append {
            0
        } else {
            self.conn.execute(&self.delete_sql, [key.as_str()]).await?
        };
        self.conn
            .execute(
                &self.insert_sql,
                [key.as_str(), data.as_str(), self.load_id.as_str()],
            )
            .await?;

        if replaced > 0 {
            self.stats.rows_updated += 1;
        } else {
            self.stats.rows_inserted += 1;
        }

        for (column, _) in self.schema.observe(record) {
            self.dirty_columns.insert(column);
        }
        Ok(())
    }

    async fn flush_columns(&self) -> Result<()> {
        let table = self.table.name();
        for column in &self.dirty_columns {
            let Some(data_type) = self.schema.get(column) else {
                continue;
            };
            self.conn
                .execute(
                    "DELETE FROM _jaffle_columns WHERE table_name = ?1 AND column_name = ?2",
                    [table, column.as_str()],
                )
                .await?;
            self.conn
                .execute(
                    "INSERT INTO _jaffle_columns (table_name, column_name, data_type) \
                     VALUES (?1, ?2, ?3)",
                    [table, column.as_str(), data_type.as_str()],
                )
                .await?;
        }
        Ok(())
    }
}

impl TableWriter for TursoTableWriter {
    fn table(&self) -> &TableSpec {
        &self.table
    }

    async fn write(&mut self, batch: &Batch) -> Result<()> {
        for record in batch {
            self.write_record(record).await?;
        }
        debug!(
            table = %self.table.name(),
            records = batch.len(),
            "Batch written"
        );
        Ok(())
    }

    async fn commit(self) -> Result<TableStats> {
        let committed = match self.flush_columns().await {
            Ok(()) => self.conn.execute("COMMIT", ()).await.map_err(SinkError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = committed {
            // Release the write lock before the connection is dropped
            if let Err(rollback_err) = self.conn.execute("ROLLBACK", ()).await {
                debug!(
                    table = %self.table.name(),
                    error = %rollback_err,
                    "Rollback after failed commit"
                );
            }
            warn!(table = %self.table.name(), error = %e, "Commit failed, table rolled back");
            return Err(e);
        }

        if self.stats.rows_rejected > 0 {
            warn!(
                table = %self.table.name(),
                rejected = self.stats.rows_rejected,
                "Records without primary key were not loaded"
            );
        }
        info!(
            table = %self.table.name(),
            disposition = %self.table.write_disposition(),
            received = self.stats.rows_received,
            inserted = self.stats.rows_inserted,
            updated = self.stats.rows_updated,
            "Table committed"
        );
        Ok(self.stats)
    }

    async fn rollback(self) -> Result<()> {
        self.conn.execute("ROLLBACK", ()).await?;
        warn!(
            table = %self.table.name(),
            discarded = self.stats.rows_received,
            "Table rolled back"
        );
        Ok(())
    }
}

/// Key value of a record: the single key column's value, or an array of
/// values for a compound key
fn primary_key_value(record: &Record, primary_key: &[String]) -> Option<Value> {
    let mut values = Vec::with_capacity(primary_key.len());
    for column in primary_key {
        match record.get(column) {
            None | Some(Value::Null) => return None,
            Some(value) => values.push(value.clone()),
        }
    }

    if values.len() == 1 {
        values.pop()
    } else {
        Some(Value::Array(values))
    }
}
