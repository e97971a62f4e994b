//! Tests for column type inference

use jaffle_protocol::normalize_record;
use serde_json::json;

use super::{ColumnType, TableSchema};

#[test]
fn test_type_of_values() {
    assert_eq!(ColumnType::of(&json!(null)), ColumnType::Null);
    assert_eq!(ColumnType::of(&json!(true)), ColumnType::Bool);
    assert_eq!(ColumnType::of(&json!(42)), ColumnType::BigInt);
    assert_eq!(ColumnType::of(&json!(-7)), ColumnType::BigInt);
    assert_eq!(ColumnType::of(&json!(u64::MAX)), ColumnType::BigInt);
    assert_eq!(ColumnType::of(&json!(4.5)), ColumnType::Double);
    assert_eq!(ColumnType::of(&json!("Ada")), ColumnType::Text);
    assert_eq!(ColumnType::of(&json!([1, 2])), ColumnType::Json);
    assert_eq!(ColumnType::of(&json!({"a": 1})), ColumnType::Json);
}

#[test]
fn test_widening_rules() {
    use ColumnType::*;

    assert_eq!(BigInt.widen(BigInt), BigInt);
    assert_eq!(BigInt.widen(Double), Double);
    assert_eq!(Double.widen(BigInt), Double);
    assert_eq!(Null.widen(Text), Text);
    assert_eq!(Bool.widen(Null), Bool);
    assert_eq!(Null.widen(Null), Null);
    assert_eq!(Text.widen(BigInt), Json);
    assert_eq!(Bool.widen(Double), Json);
    assert_eq!(Json.widen(Null), Json);
}

#[test]
fn test_type_names_parse_back() {
    use ColumnType::*;

    for ty in [BigInt, Double, Bool, Text, Json, Null] {
        assert_eq!(ColumnType::parse(ty.as_str()), Some(ty));
    }
    assert_eq!(ColumnType::parse("varchar"), None);
}

#[test]
fn test_observe_registers_new_columns_in_order() {
    let mut schema = TableSchema::default();
    let changed = schema.observe(&normalize_record(json!({"id": 1, "name": "Ada"})));

    assert_eq!(
        changed,
        vec![
            ("id".to_string(), ColumnType::BigInt),
            ("name".to_string(), ColumnType::Text),
        ]
    );
    assert_eq!(schema.columns().len(), 2);
}

#[test]
fn test_observe_reports_only_changes() {
    let mut schema = TableSchema::default();
    schema.observe(&normalize_record(json!({"id": 1, "price": 3, "note": null})));

    let changed = schema.observe(&normalize_record(json!({"id": 2, "price": 3.5, "note": null})));
    assert_eq!(changed, vec![("price".to_string(), ColumnType::Double)]);

    let changed = schema.observe(&normalize_record(json!({"id": 3, "price": 4})));
    assert!(changed.is_empty());
    assert_eq!(schema.get("price"), Some(ColumnType::Double));

    let changed = schema.observe(&normalize_record(json!({"id": 4, "note": "late"})));
    assert_eq!(changed, vec![("note".to_string(), ColumnType::Text)]);
}

#[test]
fn test_conflicting_types_widen_to_json() {
    let mut schema = TableSchema::from_columns(vec![("code".to_string(), ColumnType::Text)]);
    schema.observe(&normalize_record(json!({"code": 12})));
    assert_eq!(schema.get("code"), Some(ColumnType::Json));
}
