//! Column type inference
//!
//! Every top-level field of a loaded record is registered as a column with a
//! type inferred from its JSON value. Types only ever widen: a column that
//! has held both integers and floats is `double`, one that has been null is
//! upgraded by the first concrete value, and any other conflict falls back to
//! `json`.

use std::fmt;

use jaffle_protocol::Record;
use serde_json::Value;

/// Inferred type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    BigInt,
    Double,
    Bool,
    Text,
    Json,
    Null,
}

impl ColumnType {
    /// Type of a single JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::BigInt,
            Value::Number(_) => Self::Double,
            Value::String(_) => Self::Text,
            Value::Array(_) | Value::Object(_) => Self::Json,
        }
    }

    /// Narrowest type able to hold values of both `self` and `other`
    pub fn widen(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Null, t) | (t, Self::Null) => t,
            (Self::BigInt, Self::Double) | (Self::Double, Self::BigInt) => Self::Double,
            _ => Self::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BigInt => "bigint",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::Text => "text",
            Self::Json => "json",
            Self::Null => "null",
        }
    }

    /// Parse a stored type name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bigint" => Some(Self::BigInt),
            "double" => Some(Self::Double),
            "bool" => Some(Self::Bool),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "null" => Some(Self::Null),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known columns of one table, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<(String, ColumnType)>,
}

impl TableSchema {
    /// Rebuild from stored columns
    pub fn from_columns(columns: Vec<(String, ColumnType)>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[(String, ColumnType)] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, ty)| *ty)
    }

    /// Fold a record's fields into the schema
    ///
    /// Returns the columns that were added or widened, with their new type.
    pub fn observe(&mut self, record: &Record) -> Vec<(String, ColumnType)> {
        let mut changed = Vec::new();

        for (name, value) in record {
            let seen = ColumnType::of(value);
            match self.columns.iter_mut().find(|(column, _)| column == name) {
                Some((_, ty)) => {
                    let widened = ty.widen(seen);
                    if widened != *ty {
                        *ty = widened;
                        changed.push((name.clone(), widened));
                    }
                }
                None => {
                    self.columns.push((name.clone(), seen));
                    changed.push((name.clone(), seen));
                }
            }
        }

        changed
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;
