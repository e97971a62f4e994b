//! Batch - One page worth of records
//!
//! A `Batch` is the unit that flows from a paginator through an extractor to
//! the destination. It is forwarded unmodified: no field is validated or
//! converted on the way.

use serde::Serialize;
use serde_json::{Map, Value};

/// One API entity instance: string keys, heterogeneous values
pub type Record = Map<String, Value>;

/// Ordered sequence of records produced by one page fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Batch {
    records: Vec<Record>,
}

impl Batch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a batch holding a single record
    pub fn single(record: Record) -> Self {
        Self {
            records: vec![record],
        }
    }

    /// Build a batch from JSON values, normalizing each into a record
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self {
            records: values.into_iter().map(normalize_record).collect(),
        }
    }

    /// Number of records
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch has no records
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow the records
    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl From<Vec<Record>> for Batch {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl IntoIterator for Batch {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Turn an arbitrary JSON value into a record
///
/// Objects pass through untouched. Any other value is wrapped as
/// `{"value": <value>}` so scalar list elements still land in a table.
pub fn normalize_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => {
            let mut record = Map::with_capacity(1);
            record.insert("value".to_string(), other);
            record
        }
    }
}
