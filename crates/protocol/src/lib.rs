//! Jaffle Protocol - Core types shared across the pipeline
//!
//! This crate provides the types that flow from connectors to sinks:
//! - `Record` - One API entity, an open-ended JSON object
//! - `Batch` - The records produced by a single page fetch
//! - `TableSpec` - Destination table name, write disposition and merge key
//!
//! No schema is enforced on records. Whatever the upstream API returns is
//! forwarded unchanged; the destination infers columns on load.

mod batch;
mod error;
mod table;

pub use batch::{Batch, Record, normalize_record};
pub use error::ProtocolError;
pub use table::{TableSpec, WriteDisposition, is_valid_identifier};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Default merge key for every resource table
pub const DEFAULT_PRIMARY_KEY: &str = "id";
