//! Jaffle - Pipeline
//!
//! Drives a source's extractors into a destination, one table at a time.
//!
//! # Architecture
//!
//! ```text
//! [Source]                       [Pipeline]                  [Destination]
//!   customers ──next_batch──┐                           ┌──→ customers
//!   orders ─────next_batch──┼──→ TableWriter per table ─┼──→ orders
//!   products ───next_batch──┘      commit / rollback    └──→ products
//!                                                             _jaffle_loads
//! ```
//!
//! # Key Design
//!
//! - **Lazy pull**: each extractor is drained only while its table is open
//! - **Per-table transactions**: a write error rolls back the current table
//!   and fails the load; earlier tables stay committed
//! - **Load bookkeeping**: every run records its load id and final status
//! - **Trace**: timings and extraction outcomes of the last run are kept for
//!   reporting
//!
//! # Example
//!
//! ```ignore
//! use jaffle_pipeline::Runner;
//! use jaffle_sinks::TursoDestination;
//!
//! let destination = TursoDestination::open("data", "jaffle_shop_data").await?;
//! let mut runner = Runner::new(pipeline_config, source_config, destination);
//! let ok = runner.run().await;
//! ```

mod error;
mod load_info;
mod pipeline;
mod runner;
mod trace;

pub use error::{PipelineError, Result};
pub use load_info::{LoadInfo, TableLoadInfo};
pub use pipeline::{Pipeline, new_load_id};
pub use runner::Runner;
pub use trace::PipelineTrace;

// Re-export key types from dependencies for convenience
pub use jaffle_config::{PipelineConfig, ProgressMode};
pub use jaffle_connectors::{JaffleShopConfig, Source};

#[cfg(test)]
mod pipeline_test;
