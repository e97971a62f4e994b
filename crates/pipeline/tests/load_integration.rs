//! Integration tests for loading into an on-disk dataset
//!
//! Each run opens the dataset file fresh, the way separate `jaffle`
//! invocations do.

use jaffle_connectors::test_utils::{MockApi, MockResponse, paged, records};
use jaffle_pipeline::{JaffleShopConfig, PipelineConfig, Runner};
use jaffle_sinks::{ColumnType, Destination, LoadStatus, TursoDestination};
use serde_json::{Value, json};

async fn run_against(data_dir: &str, config: JaffleShopConfig) -> bool {
    let destination = TursoDestination::open(data_dir, "jaffle_shop_data").await.unwrap();
    let mut runner = Runner::new(PipelineConfig::default(), config, destination);
    runner.run().await
}

#[tokio::test]
async fn test_repeated_runs_converge_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_string_lossy().to_string();
    let api = MockApi::start(paged(2, 50)).await;

    assert!(run_against(&data_dir, api.config()).await);
    assert!(run_against(&data_dir, api.config()).await);

    let destination = TursoDestination::open(&data_dir, "jaffle_shop_data").await.unwrap();
    for table in ["customers", "orders", "products"] {
        assert_eq!(destination.row_count(table).await.unwrap(), 100);
    }

    let loads = destination.loads().await.unwrap();
    assert_eq!(loads.len(), 2);
    assert!(loads.iter().all(|l| l.status == LoadStatus::Completed));
    assert!(loads.iter().all(|l| l.pipeline_name == "jaffle_shop"));
}

#[tokio::test]
async fn test_changed_records_are_updated_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_string_lossy().to_string();

    let before = MockApi::start(paged(1, 3)).await;
    assert!(run_against(&data_dir, before.config()).await);

    // Same ids, one renamed customer and one new one
    let after = MockApi::start(|endpoint, page| match (endpoint, page) {
        ("/customers", 1) => MockResponse::Json(json!([
            {"id": 1, "name": "customer_1"},
            {"id": 2, "name": "renamed"},
            {"id": 3, "name": "customer_3"},
            {"id": 4, "name": "customer_4"},
        ])),
        (_, 1) => MockResponse::Json(Value::Array(records(endpoint, 1, 3))),
        _ => MockResponse::Json(json!([])),
    })
    .await;
    assert!(run_against(&data_dir, after.config()).await);

    let destination = TursoDestination::open(&data_dir, "jaffle_shop_data").await.unwrap();
    let customers = destination.rows("customers").await.unwrap();
    assert_eq!(customers.len(), 4);
    assert_eq!(customers[1]["name"], json!("renamed"));
    assert_eq!(destination.row_count("orders").await.unwrap(), 3);
}

#[tokio::test]
async fn test_column_registry_follows_records() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_string_lossy().to_string();
    let api = MockApi::start(paged(1, 2)).await;

    assert!(run_against(&data_dir, api.config()).await);

    let destination = TursoDestination::open(&data_dir, "jaffle_shop_data").await.unwrap();
    assert_eq!(
        destination.columns("products").await.unwrap(),
        vec![
            ("id".to_string(), ColumnType::BigInt),
            ("name".to_string(), ColumnType::Text),
            ("price".to_string(), ColumnType::Double),
        ]
    );
}
