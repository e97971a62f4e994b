//! Tests for Pipeline
//!
//! Every test runs the real extractors against the in-process mock API and
//! loads into an in-memory turso dataset.

use chrono::{TimeZone, Utc};
use jaffle_config::{PipelineConfig, ProgressMode};
use jaffle_connectors::test_utils::{MockApi, MockResponse, paged, records, unreachable_base_url};
use jaffle_connectors::{ExtractStatus, JaffleShopConfig, jaffle_shop_source};
use jaffle_protocol::{Batch, TableSpec};
use jaffle_sinks::{
    Destination, LoadRecord, LoadStatus, SinkError, TableStats, TableWriter, TursoDestination,
    TursoTableWriter,
};
use serde_json::{Value, json};

use crate::error::PipelineError;
use crate::load_info::LoadInfo;
use crate::pipeline::{Pipeline, new_load_id};

const TABLES: [&str; 3] = ["customers", "orders", "products"];

async fn memory_pipeline() -> Pipeline<TursoDestination> {
    let destination = TursoDestination::memory("jaffle_shop_data").await.unwrap();
    Pipeline::new(PipelineConfig::default(), destination)
}

async fn run_once<D: Destination>(
    pipeline: &mut Pipeline<D>,
    config: &JaffleShopConfig,
) -> crate::Result<LoadInfo> {
    let mut source = jaffle_shop_source(config).unwrap();
    pipeline.run(&mut source).await
}

/// Destination that fails every write to one table
pub(crate) struct FlakyDestination {
    pub inner: TursoDestination,
    pub fail_table: &'static str,
}

pub(crate) struct FlakyWriter {
    inner: TursoTableWriter,
    fail: bool,
}

impl FlakyDestination {
    pub async fn new(fail_table: &'static str) -> Self {
        Self {
            inner: TursoDestination::memory("jaffle_shop_data").await.unwrap(),
            fail_table,
        }
    }
}

impl Destination for FlakyDestination {
    type Writer = FlakyWriter;

    fn name(&self) -> &'static str {
        "flaky"
    }

    fn dataset_name(&self) -> &str {
        self.inner.dataset_name()
    }

    async fn open_table(&self, table: &TableSpec, load_id: &str) -> Result<FlakyWriter, SinkError> {
        Ok(FlakyWriter {
            inner: self.inner.open_table(table, load_id).await?,
            fail: table.name() == self.fail_table,
        })
    }

    async fn row_count(&self, table: &str) -> Result<u64, SinkError> {
        self.inner.row_count(table).await
    }

    async fn record_load(&self, load: &LoadRecord) -> Result<(), SinkError> {
        self.inner.record_load(load).await
    }
}

impl TableWriter for FlakyWriter {
    fn table(&self) -> &TableSpec {
        self.inner.table()
    }

    async fn write(&mut self, batch: &Batch) -> Result<(), SinkError> {
        self.inner.write(batch).await?;
        if self.fail {
            return Err(SinkError::Io {
                path: "flaky".into(),
                source: std::io::Error::other("disk full"),
            });
        }
        Ok(())
    }

    async fn commit(self) -> Result<TableStats, SinkError> {
        self.inner.commit().await
    }

    async fn rollback(self) -> Result<(), SinkError> {
        self.inner.rollback().await
    }
}

// =============================================================================
// Load ids
// =============================================================================

#[test]
fn test_load_id_is_seconds_dot_micros() {
    let at = Utc.timestamp_opt(1_700_000_000, 42_000).single().unwrap();
    assert_eq!(new_load_id(at), "1700000000.000042");
}

// =============================================================================
// Successful loads
// =============================================================================

#[tokio::test]
async fn test_full_pages_loaded_into_every_table() {
    let api = MockApi::start(paged(2, 50)).await;
    let mut pipeline = memory_pipeline().await;

    let info = run_once(&mut pipeline, &api.config()).await.unwrap();

    assert_eq!(info.pipeline_name, "jaffle_shop");
    assert_eq!(info.destination, "turso");
    assert_eq!(info.dataset_name, "jaffle_shop_data");
    let names: Vec<&str> = info.tables.iter().map(|t| t.table.as_str()).collect();
    assert_eq!(names, TABLES);
    for table in &info.tables {
        assert_eq!(table.rows_received, 100);
        assert_eq!(table.rows_merged, 100);
        assert_eq!(table.rows_rejected, 0);
        assert_eq!(table.row_count_after, 100);
    }

    let loads = pipeline.destination().loads().await.unwrap();
    assert_eq!(loads.len(), 1);
    assert_eq!(loads[0].load_id, info.load_id);
    assert_eq!(loads[0].status, LoadStatus::Completed);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let api = MockApi::start(paged(3, 50)).await;
    let mut pipeline = memory_pipeline().await;

    let first = run_once(&mut pipeline, &api.config()).await.unwrap();
    let second = run_once(&mut pipeline, &api.config()).await.unwrap();

    for (a, b) in first.tables.iter().zip(&second.tables) {
        assert_eq!(a.row_count_after, 150);
        assert_eq!(b.row_count_after, a.row_count_after);
        assert_eq!(b.rows_merged, 150);
    }
    for table in TABLES {
        assert_eq!(pipeline.destination().row_count(table).await.unwrap(), 150);
    }
    assert_eq!(pipeline.destination().loads().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_unreachable_api_loads_placeholders() {
    let config = JaffleShopConfig::with_base_url(unreachable_base_url());
    let mut pipeline = memory_pipeline().await;

    let info = run_once(&mut pipeline, &config).await.unwrap();

    for table in &info.tables {
        assert_eq!(table.rows_received, 1);
        assert_eq!(table.row_count_after, 1);
    }

    let destination = pipeline.destination();
    let rows = |v: Vec<jaffle_protocol::Record>| {
        v.into_iter().map(Value::Object).collect::<Vec<_>>()
    };
    assert_eq!(
        rows(destination.rows("customers").await.unwrap()),
        vec![json!({"id": 0, "name": "dummy_customer"})]
    );
    assert_eq!(
        rows(destination.rows("orders").await.unwrap()),
        vec![json!({"id": 0, "customer_id": 0})]
    );
    assert_eq!(
        rows(destination.rows("products").await.unwrap()),
        vec![json!({"id": 0, "name": "dummy_product"})]
    );

    let trace = pipeline.last_trace().unwrap();
    assert!(trace.is_success());
    assert_eq!(trace.degraded_resources(), TABLES.to_vec());
}

#[tokio::test]
async fn test_never_empty_api_stops_at_page_ceiling() {
    let api = MockApi::start(|endpoint, page| {
        MockResponse::Json(Value::Array(records(endpoint, u64::from(page), 1)))
    })
    .await;
    let mut pipeline = memory_pipeline().await;

    let info = run_once(&mut pipeline, &api.config()).await.unwrap();

    assert_eq!(api.request_count(), 300);
    for table in TABLES {
        assert_eq!(api.pages(&format!("/{table}")).len(), 100);
        assert_eq!(info.table(table).map(|t| t.row_count_after), Some(100));
    }
}

#[tokio::test]
async fn test_records_without_id_rejected() {
    let api = MockApi::start(|_, page| {
        if page == 1 {
            MockResponse::Json(json!([{"id": 1, "name": "kept"}, {"name": "no id"}, {"id": null}]))
        } else {
            MockResponse::Json(json!([]))
        }
    })
    .await;
    let mut pipeline = memory_pipeline().await;

    let info = run_once(&mut pipeline, &api.config()).await.unwrap();

    assert!(info.has_rejections());
    for table in &info.tables {
        assert_eq!(table.rows_received, 3);
        assert_eq!(table.rows_merged, 1);
        assert_eq!(table.rows_rejected, 2);
        assert_eq!(table.row_count_after, 1);
    }
}

#[tokio::test]
async fn test_mid_stream_error_keeps_partial_table() {
    let api = MockApi::start(|endpoint, page| match (endpoint, page) {
        ("/orders", 2) => MockResponse::Status(500),
        (_, 1) => MockResponse::Json(Value::Array(records(endpoint, 1, 50))),
        _ => MockResponse::Json(json!([])),
    })
    .await;
    let mut pipeline = memory_pipeline().await;

    let info = run_once(&mut pipeline, &api.config()).await.unwrap();

    assert_eq!(info.table("orders").map(|t| t.row_count_after), Some(50));
    let trace = pipeline.last_trace().unwrap();
    assert!(matches!(trace.extractions[1].status, ExtractStatus::Truncated { .. }));
    assert_eq!(trace.degraded_resources(), vec!["orders"]);
}

#[tokio::test]
async fn test_quiet_progress_mode_loads_the_same() {
    let api = MockApi::start(paged(1, 10)).await;
    let config = PipelineConfig {
        progress: ProgressMode::None,
        ..PipelineConfig::default()
    };
    let destination = TursoDestination::memory("quiet").await.unwrap();
    let mut pipeline = Pipeline::new(config, destination);

    let info = run_once(&mut pipeline, &api.config()).await.unwrap();

    assert_eq!(info.dataset_name, "quiet");
    assert_eq!(info.total_rows_merged(), 30);
}

// =============================================================================
// Failed loads
// =============================================================================

#[tokio::test]
async fn test_write_failure_rolls_back_table_and_stops() {
    let api = MockApi::start(paged(1, 20)).await;
    let destination = FlakyDestination::new("orders").await;
    let mut pipeline = Pipeline::new(PipelineConfig::default(), destination);

    let err = run_once(&mut pipeline, &api.config()).await.unwrap_err();

    match &err {
        PipelineError::Destination { table, .. } => assert_eq!(table, "orders"),
        other => panic!("expected destination error, got {other:?}"),
    }

    let destination = &pipeline.destination().inner;
    assert_eq!(destination.row_count("customers").await.unwrap(), 20);
    assert_eq!(destination.row_count("orders").await.unwrap(), 0);
    assert_eq!(destination.row_count("products").await.unwrap(), 0);
    assert!(api.pages("/products").is_empty());

    let loads = destination.loads().await.unwrap();
    assert_eq!(loads.len(), 1);
    assert_eq!(loads[0].status, LoadStatus::Failed);

    let trace = pipeline.last_trace().unwrap();
    assert!(!trace.is_success());
    assert!(trace.error.as_deref().unwrap_or_default().contains("orders"));
}
