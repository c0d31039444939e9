pub mod types;

pub use types::{CollectionSchema, DataType, FieldSchema};

#[cfg(test)]
mod types_test;
