//! Destination table description
//!
//! Every resource is tagged with the table it lands in, how rows are written
//! there, and which columns identify a row.

use std::fmt;

use crate::error::ProtocolError;
use crate::{DEFAULT_PRIMARY_KEY, Result};

/// How a table receives new rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteDisposition {
    /// Insert every row, no deduplication
    Append,
    /// Drop existing rows, then insert
    Replace,
    /// Insert or update by primary key
    #[default]
    Merge,
}

impl WriteDisposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Replace => "replace",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for WriteDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table name, write disposition and merge key for one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    name: String,
    write_disposition: WriteDisposition,
    primary_key: Vec<String>,
}

impl TableSpec {
    /// Create a table spec
    ///
    /// # Errors
    ///
    /// Returns error if the name is not a plain identifier, or if a merge
    /// table has no primary key.
    pub fn new(
        name: impl Into<String>,
        write_disposition: WriteDisposition,
        primary_key: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        if !is_valid_identifier(&name) {
            return Err(ProtocolError::InvalidTableName(name));
        }
        if write_disposition == WriteDisposition::Merge && primary_key.is_empty() {
            return Err(ProtocolError::MissingPrimaryKey(name));
        }
        Ok(Self {
            name,
            write_disposition,
            primary_key,
        })
    }

    /// Merge-upsert table keyed by `id`
    pub fn merge(name: impl Into<String>) -> Result<Self> {
        Self::new(
            name,
            WriteDisposition::Merge,
            vec![DEFAULT_PRIMARY_KEY.to_string()],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn write_disposition(&self) -> WriteDisposition {
        self.write_disposition
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }
}

/// Table names are interpolated into SQL, so keep them to `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
