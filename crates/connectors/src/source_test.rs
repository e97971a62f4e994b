//! Tests for the Jaffle Shop source

use jaffle_protocol::WriteDisposition;
use serde_json::{Value, json};

use crate::config::JaffleShopConfig;
use crate::resource::ExtractStatus;
use crate::source::{jaffle_shop_resources, jaffle_shop_source};
use crate::test_utils::{MockApi, paged, unreachable_base_url};

#[test]
fn test_three_resources_in_order() {
    let defs = jaffle_shop_resources().unwrap();
    let names: Vec<&str> = defs.iter().map(|d| d.name()).collect();
    let endpoints: Vec<&str> = defs.iter().map(|d| d.endpoint()).collect();

    assert_eq!(names, vec!["customers", "orders", "products"]);
    assert_eq!(endpoints, vec!["/customers", "/orders", "/products"]);
}

#[test]
fn test_every_table_merges_on_id() {
    for def in jaffle_shop_resources().unwrap() {
        assert_eq!(def.table().name(), def.name());
        assert_eq!(def.table().write_disposition(), WriteDisposition::Merge);
        assert_eq!(def.table().primary_key(), ["id".to_string()]);
    }
}

#[test]
fn test_placeholder_shapes() {
    let placeholders: Vec<Value> = jaffle_shop_resources()
        .unwrap()
        .into_iter()
        .map(|d| Value::Object(d.placeholder().clone()))
        .collect();

    assert_eq!(
        placeholders,
        vec![
            json!({"id": 0, "name": "dummy_customer"}),
            json!({"id": 0, "customer_id": 0}),
            json!({"id": 0, "name": "dummy_product"}),
        ]
    );
}

#[test]
fn test_building_source_performs_no_io() {
    let config = JaffleShopConfig::with_base_url(unreachable_base_url());
    let source = jaffle_shop_source(&config).expect("should build source");

    assert_eq!(source.name(), "jaffle_shop");
    assert_eq!(source.table_names(), vec!["customers", "orders", "products"]);
    assert!(
        source
            .extraction_results()
            .iter()
            .all(|r| r.status == ExtractStatus::Running && r.records == 0)
    );
}

#[tokio::test]
async fn test_source_pulls_each_resource_lazily() {
    let api = MockApi::start(paged(2, 50)).await;
    let mut source = jaffle_shop_source(&api.config()).unwrap();

    let first = source.resources_mut()[0].next_batch().await;
    assert!(first.is_some());
    // Only the first customers page has been requested so far
    assert_eq!(api.request_count(), 1);

    let mut totals = Vec::new();
    for resource in source.resources_mut() {
        while resource.next_batch().await.is_some() {}
        totals.push(resource.result().records);
    }

    assert_eq!(totals, vec![100, 100, 100]);
    assert_eq!(api.pages("/customers"), vec![1, 2, 3]);
    assert_eq!(api.pages("/orders"), vec![1, 2, 3]);
    assert_eq!(api.pages("/products"), vec![1, 2, 3]);
}
