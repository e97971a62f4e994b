//! Load summary returned by a successful run

use std::fmt;

/// Outcome of loading one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoadInfo {
    pub table: String,
    /// Records handed to the destination, placeholders included
    pub rows_received: u64,
    /// Rows inserted or updated
    pub rows_merged: u64,
    /// Records skipped for a missing primary key
    pub rows_rejected: u64,
    /// Rows stored in the table after commit
    pub row_count_after: u64,
}

/// Summary of one completed load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadInfo {
    pub pipeline_name: String,
    pub destination: String,
    pub dataset_name: String,
    pub load_id: String,
    pub tables: Vec<TableLoadInfo>,
}

impl LoadInfo {
    /// Info for one table by name
    pub fn table(&self, name: &str) -> Option<&TableLoadInfo> {
        self.tables.iter().find(|t| t.table == name)
    }

    pub fn total_rows_merged(&self) -> u64 {
        self.tables.iter().map(|t| t.rows_merged).sum()
    }

    pub fn has_rejections(&self) -> bool {
        self.tables.iter().any(|t| t.rows_rejected > 0)
    }
}

impl fmt::Display for TableLoadInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} received, {} merged, {} rejected, {} rows",
            self.table,
            self.rows_received,
            self.rows_merged,
            self.rows_rejected,
            self.row_count_after
        )
    }
}

impl fmt::Display for LoadInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pipeline {} load {} to {} dataset {}: {} tables",
            self.pipeline_name,
            self.load_id,
            self.destination,
            self.dataset_name,
            self.tables.len()
        )?;
        for table in &self.tables {
            write!(f, "\n  {}", table)?;
        }
        Ok(())
    }
}
