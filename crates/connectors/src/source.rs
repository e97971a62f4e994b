//! Jaffle Shop source
//!
//! Bundles the configured resource extractors into one named source. Building
//! a source performs no I/O; requests start when batches are pulled.

use jaffle_protocol::{TableSpec, normalize_record};
use serde_json::json;

use crate::config::JaffleShopConfig;
use crate::error::ConnectorError;
use crate::resource::{ExtractionResult, ResourceDef, ResourceExtractor};

/// Source name reported in traces
pub const SOURCE_NAME: &str = "jaffle_shop";

/// A named collection of resource extractors
pub struct Source {
    name: String,
    resources: Vec<ResourceExtractor>,
}

impl Source {
    pub fn new(name: impl Into<String>, resources: Vec<ResourceExtractor>) -> Self {
        Self {
            name: name.into(),
            resources,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resources(&self) -> &[ResourceExtractor] {
        &self.resources
    }

    /// Extractors in load order
    pub fn resources_mut(&mut self) -> &mut [ResourceExtractor] {
        &mut self.resources
    }

    /// Destination table names in load order
    pub fn table_names(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.table().name()).collect()
    }

    /// Snapshot of every resource's bookkeeping
    pub fn extraction_results(&self) -> Vec<ExtractionResult> {
        self.resources.iter().map(|r| r.result().clone()).collect()
    }
}

/// Customers, orders and products: merge-upserted on `id`
pub fn jaffle_shop_resources() -> Result<Vec<ResourceDef>, ConnectorError> {
    Ok(vec![
        ResourceDef::new(
            "customers",
            "/customers",
            TableSpec::merge("customers")?,
            normalize_record(json!({"id": 0, "name": "dummy_customer"})),
        ),
        ResourceDef::new(
            "orders",
            "/orders",
            TableSpec::merge("orders")?,
            normalize_record(json!({"id": 0, "customer_id": 0})),
        ),
        ResourceDef::new(
            "products",
            "/products",
            TableSpec::merge("products")?,
            normalize_record(json!({"id": 0, "name": "dummy_product"})),
        ),
    ])
}

/// Build the Jaffle Shop source from config
///
/// # Errors
///
/// Returns error if HTTP client creation fails
pub fn jaffle_shop_source(config: &JaffleShopConfig) -> Result<Source, ConnectorError> {
    let client = build_client(config)?;
    let resources = jaffle_shop_resources()?
        .into_iter()
        .map(|def| ResourceExtractor::new(def, client.clone(), config))
        .collect();

    Ok(Source::new(SOURCE_NAME, resources))
}

/// HTTP client shared by every extractor of a source
///
/// # Errors
///
/// Returns error if the TLS backend cannot be initialized
pub fn build_client(config: &JaffleShopConfig) -> Result<reqwest::Client, ConnectorError> {
    reqwest::Client::builder()
        .user_agent(concat!("jaffle/", env!("CARGO_PKG_VERSION")))
        .timeout(config.timeout())
        .build()
        .map_err(|e| ConnectorError::Init(format!("HTTP client: {}", e)))
}
