use crate::test_helpers::factories::{FieldDataFactory, PartialResultFactory};

#[test]
fn row_count_defaults_to_first_column() {
    let partial = PartialResultFactory::new()
        .with_column(FieldDataFactory::longs(1, &[1, 2, 3]).create())
        .create();
    assert_eq!(partial.row_count(), 3);
}

#[test]
fn string_key_rows_store_placeholder_for_null() {
    let partial =
        PartialResultFactory::string_key_rows(101, 102, &[(Some("A"), 1), (None, 2)]);
    let key = partial.field(101).unwrap();
    assert_eq!(key.string_data().unwrap()[1], "");
    assert!(key.is_valid(0));
    assert!(!key.is_valid(1));
    assert_eq!(partial.field(102).unwrap().long_data().unwrap(), &[1, 2]);
}
