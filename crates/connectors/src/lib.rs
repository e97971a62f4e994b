//! Jaffle - Connectors
//!
//! Pull-based extraction of the Jaffle Shop REST API. Each resource
//! (customers, orders, products) is paged through until exhaustion and its
//! records are handed out one `Batch` at a time.
//!
//! # Layers
//!
//! - **Paginator** - fetches `?page=N&limit=50` until an empty page, the page
//!   ceiling, or an error; every fetch ends in a tagged `PageOutcome`
//! - **ResourceExtractor** - drives one paginator, counts records, and
//!   substitutes a placeholder record when a resource fails before yielding
//!   anything
//! - **Source** - the three configured extractors, tagged with their
//!   destination tables
//!
//! # Example
//!
//! ```ignore
//! use jaffle_connectors::{JaffleShopConfig, jaffle_shop_source};
//!
//! let mut source = jaffle_shop_source(&JaffleShopConfig::default())?;
//! for resource in source.resources_mut() {
//!     while let Some(batch) = resource.next_batch().await {
//!         // hand batch to the destination
//!     }
//! }
//! ```

pub mod config;
mod error;
mod paginator;
mod resource;
mod source;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::JaffleShopConfig;
pub use error::ConnectorError;
pub use paginator::{EndReason, PageOutcome, Paginator};
pub use resource::{ExtractStatus, ExtractionResult, ResourceDef, ResourceExtractor};
pub use source::{Source, build_client, jaffle_shop_resources, jaffle_shop_source};

#[cfg(test)]
mod source_test;
