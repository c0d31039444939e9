use crate::engine::errors::ReduceError;
use crate::engine::schema::{CollectionSchema, DataType, FieldSchema};

#[test]
fn parses_primitive_aliases() {
    assert_eq!(DataType::from_primitive_str("string"), Some(DataType::VarChar));
    assert_eq!(DataType::from_primitive_str("INT"), Some(DataType::Int64));
    assert_eq!(DataType::from_primitive_str("float64"), Some(DataType::Double));
    assert_eq!(DataType::from_primitive_str("tinyint"), Some(DataType::Int8));
    assert_eq!(DataType::from_primitive_str("blob"), None);
}

#[test]
fn widening_follows_numeric_family() {
    assert_eq!(DataType::Int8.widened(), DataType::Int64);
    assert_eq!(DataType::Int32.widened(), DataType::Int64);
    assert_eq!(DataType::Int64.widened(), DataType::Int64);
    assert_eq!(DataType::Float.widened(), DataType::Double);
    assert_eq!(DataType::VarChar.widened(), DataType::VarChar);
}

#[test]
fn capability_flags() {
    assert!(DataType::VarChar.is_groupable());
    assert!(DataType::Bool.is_groupable());
    assert!(!DataType::Json.is_groupable());
    assert!(DataType::VarChar.is_orderable());
    assert!(!DataType::Bool.is_orderable());
    assert!(!DataType::VarChar.is_numeric());
}

#[test]
fn schema_resolves_fields_and_primary_key() {
    let schema = CollectionSchema::new(vec![
        FieldSchema::new(100, "pk", DataType::VarChar).primary_key(),
        FieldSchema::new(101, "c1", DataType::VarChar).nullable(),
    ])
    .unwrap();

    assert_eq!(schema.primary_key().map(|f| f.field_id), Some(100));
    assert!(schema.field(101).unwrap().nullable);
    assert!(schema.field(999).is_none());
    assert!(matches!(
        schema.require(999),
        Err(ReduceError::SchemaMismatch(_))
    ));
}

#[test]
fn schema_rejects_two_primary_keys() {
    let err = CollectionSchema::new(vec![
        FieldSchema::new(1, "a", DataType::Int64).primary_key(),
        FieldSchema::new(2, "b", DataType::Int64).primary_key(),
    ])
    .unwrap_err();
    assert!(matches!(err, ReduceError::SchemaMismatch(_)));
}

#[test]
fn schema_rejects_duplicate_ids() {
    let err = CollectionSchema::new(vec![
        FieldSchema::new(1, "a", DataType::Int64),
        FieldSchema::new(1, "b", DataType::VarChar),
    ])
    .unwrap_err();
    assert!(matches!(err, ReduceError::SchemaMismatch(_)));
}
