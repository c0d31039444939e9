pub mod column;
pub mod read;

pub use column::{AggregationResult, FieldData, ScalarArray};
