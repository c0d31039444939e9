use crate::engine::schema::DataType;
use crate::test_helpers::factories::FieldDataFactory;

#[test]
fn builds_string_column_with_validity() {
    let col = FieldDataFactory::strings(101, &["A", ""])
        .with_name("c1")
        .with_validity(&[true, false])
        .create();
    assert_eq!(col.field_id, 101);
    assert_eq!(col.field_name, "c1");
    assert_eq!(col.data_type, DataType::VarChar);
    assert_eq!(col.string_data().unwrap(), &["A".to_string(), String::new()]);
    assert_eq!(col.valid_data(), Some(&[true, false][..]));
}

#[test]
fn type_override_keeps_array() {
    let col = FieldDataFactory::ints(3, &[1, 2])
        .with_type(DataType::Int8)
        .create();
    assert_eq!(col.data_type, DataType::Int8);
    assert_eq!(col.int_data().unwrap(), &[1, 2]);
    assert!(col.valid_data().is_none());
}
