pub mod field_data;

pub use field_data::{AggregationResult, FieldData, ScalarArray};
