//! Database handle and read-side queries

use jaffle_protocol::{Record, TableSpec, is_valid_identifier};
use tracing::{debug, info};
use turso::{Builder, Database};

use super::writer::TursoTableWriter;
use super::{SCHEMA_COLUMNS, SCHEMA_LOADS, data_table_ddl, quote_ident};
use crate::Result;
use crate::common::{LoadRecord, LoadStatus, SinkError};
use crate::schema::{ColumnType, TableSchema};
use crate::traits::Destination;

/// One dataset stored in a turso database
pub struct TursoDestination {
    db: Database,
    dataset_name: String,
}

impl TursoDestination {
    /// Database file holding `dataset_name`
    pub fn database_path(data_dir: &str, dataset_name: &str) -> String {
        format!("{}/{}.db", data_dir, dataset_name)
    }

    /// Open (or create) `{data_dir}/{dataset_name}.db`
    ///
    /// Creates `data_dir` if it does not exist.
    pub async fn open(
        data_dir: impl Into<String>,
        dataset_name: impl Into<String>,
    ) -> Result<Self> {
        let data_dir = data_dir.into();
        let dataset_name = dataset_name.into();

        std::fs::create_dir_all(&data_dir).map_err(|source| SinkError::Io {
            path: data_dir.clone(),
            source,
        })?;

        let path = Self::database_path(&data_dir, &dataset_name);
        info!(path = %path, dataset = %dataset_name, "Opening dataset database");

        let db = Builder::new_local(&path).build().await?;
        let destination = Self { db, dataset_name };
        destination.init_schema().await?;

        Ok(destination)
    }

    /// Open an in-memory dataset (for testing and dry runs)
    pub async fn memory(dataset_name: impl Into<String>) -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        let destination = Self {
            db,
            dataset_name: dataset_name.into(),
        };
        destination.init_schema().await?;

        Ok(destination)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.db.connect()?;

        conn.execute(SCHEMA_COLUMNS, ()).await?;
        conn.execute(SCHEMA_LOADS, ()).await?;

        debug!(dataset = %self.dataset_name, "Dataset schema initialized");
        Ok(())
    }

    async fn count_rows(&self, table: &str) -> Result<u64> {
        let table = checked_table(table)?;
        if !self.table_exists(table).await? {
            return Ok(0);
        }

        let conn = self.db.connect()?;
        let mut rows = conn
            .query(&format!("SELECT COUNT(*) FROM {}", quote_ident(table)), ())
            .await?;

        let count = match rows.next().await? {
            Some(row) => *row.get_value(0)?.as_integer().unwrap_or(&0),
            None => 0,
        };
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Every stored record of a table, ordered by key
    pub async fn rows(&self, table: &str) -> Result<Vec<Record>> {
        let table = checked_table(table)?;
        if !self.table_exists(table).await? {
            return Ok(Vec::new());
        }

        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                &format!("SELECT data FROM {} ORDER BY id", quote_ident(table)),
                (),
            )
            .await?;

        let mut records = Vec::new();
        let empty = String::new();
        while let Some(row) = rows.next().await? {
            let value = row.get_value(0)?;
            let data = value.as_text().unwrap_or(&empty);
            records.push(serde_json::from_str(data)?);
        }
        Ok(records)
    }

    /// Registered columns of a table, ordered by name
    pub async fn columns(&self, table: &str) -> Result<Vec<(String, ColumnType)>> {
        let table = checked_table(table)?;
        let schema = load_schema(&self.db.connect()?, table).await?;
        Ok(schema.columns().to_vec())
    }

    /// Every recorded load, oldest first
    pub async fn loads(&self) -> Result<Vec<LoadRecord>> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                "SELECT load_id, pipeline_name, dataset_name, status, inserted_at \
                 FROM _jaffle_loads ORDER BY inserted_at, load_id",
                (),
            )
            .await?;

        let mut loads = Vec::new();
        let empty = String::new();
        while let Some(row) = rows.next().await? {
            let v0 = row.get_value(0)?;
            let v1 = row.get_value(1)?;
            let v2 = row.get_value(2)?;
            let v3 = row.get_value(3)?;
            let v4 = row.get_value(4)?;

            loads.push(LoadRecord {
                load_id: v0.as_text().unwrap_or(&empty).clone(),
                pipeline_name: v1.as_text().unwrap_or(&empty).clone(),
                dataset_name: v2.as_text().unwrap_or(&empty).clone(),
                status: LoadStatus::parse(v3.as_text().unwrap_or(&empty)),
                inserted_at: v4.as_text().unwrap_or(&empty).clone(),
            });
        }
        Ok(loads)
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                "SELECT name FROM sqlite_schema WHERE type = 'table' AND name = ?1",
                [table],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }
}

impl Destination for TursoDestination {
    type Writer = TursoTableWriter;

    fn name(&self) -> &'static str {
        "turso"
    }

    fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    async fn open_table(&self, table: &TableSpec, load_id: &str) -> Result<TursoTableWriter> {
        let conn = self.db.connect()?;
        conn.execute(&data_table_ddl(table.name()), ()).await?;

        let schema = load_schema(&conn, table.name()).await?;
        TursoTableWriter::begin(conn, table.clone(), load_id, schema).await
    }

    async fn row_count(&self, table: &str) -> Result<u64> {
        self.count_rows(table).await
    }

    async fn record_load(&self, load: &LoadRecord) -> Result<()> {
        let conn = self.db.connect()?;

        conn.execute(
            r#"
            INSERT INTO _jaffle_loads (load_id, pipeline_name, dataset_name, status, inserted_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            [
                load.load_id.as_str(),
                load.pipeline_name.as_str(),
                load.dataset_name.as_str(),
                load.status.as_str(),
                load.inserted_at.as_str(),
            ],
        )
        .await?;

        debug!(load_id = %load.load_id, status = %load.status, "Load recorded");
        Ok(())
    }
}

fn checked_table(table: &str) -> Result<&str> {
    if is_valid_identifier(table) {
        Ok(table)
    } else {
        Err(SinkError::InvalidTable(table.to_string()))
    }
}

pub(super) async fn load_schema(conn: &turso::Connection, table: &str) -> Result<TableSchema> {
    let mut rows = conn
        .query(
            "SELECT column_name, data_type FROM _jaffle_columns \
             WHERE table_name = ?1 ORDER BY column_name",
            [table],
        )
        .await?;

    let mut columns = Vec::new();
    let empty = String::new();
    while let Some(row) = rows.next().await? {
        let v0 = row.get_value(0)?;
        let v1 = row.get_value(1)?;
        let name = v0.as_text().unwrap_or(&empty).clone();
        let data_type =
            ColumnType::parse(v1.as_text().unwrap_or(&empty)).unwrap_or(ColumnType::Json);
        columns.push((name, data_type));
    }
    Ok(TableSchema::from_columns(columns))
}
