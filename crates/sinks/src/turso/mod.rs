//! Turso Destination - Embedded Merge-Upsert Store
//!
//! Persists each dataset in one SQLite-compatible database file
//! (`{data_dir}/{dataset}.db`).
//!
//! # Tables
//!
//! | Table | Purpose |
//! |-------|---------|
//! | `{resource}` | One row per record: key, JSON document, load id |
//! | _jaffle_columns | Inferred column types per table |
//! | _jaffle_loads | One row per pipeline load with its final status |
//!
//! # Write Dispositions
//!
//! - **Merge**: rows are keyed by the canonical JSON of their primary key and
//!   replaced when the key is seen again, so reloading unchanged data leaves
//!   the table unchanged
//! - **Append**: every record gets a fresh `{load_id}:{seq}` key
//! - **Replace**: the table is emptied when the writer opens
//!
//! All writes for one table happen inside a single transaction that the
//! pipeline commits or rolls back.

mod destination;
mod writer;

pub use destination::TursoDestination;
pub use writer::TursoTableWriter;

const SCHEMA_COLUMNS: &str = r#"
CREATE TABLE IF NOT EXISTS _jaffle_columns (
    table_name TEXT NOT NULL,
    column_name TEXT NOT NULL,
    data_type TEXT NOT NULL,
    PRIMARY KEY (table_name, column_name)
)
"#;

const SCHEMA_LOADS: &str = r#"
CREATE TABLE IF NOT EXISTS _jaffle_loads (
    load_id TEXT PRIMARY KEY,
    pipeline_name TEXT NOT NULL,
    dataset_name TEXT NOT NULL,
    status TEXT NOT NULL,
    inserted_at TEXT NOT NULL
)
"#;

/// DDL for a data table; `table` must already be a valid identifier
fn data_table_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} \
         (id TEXT PRIMARY KEY, data TEXT NOT NULL, _load_id TEXT NOT NULL)",
        quote_ident(table)
    )
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name)
}
