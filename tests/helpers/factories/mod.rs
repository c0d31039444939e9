pub mod field_data_factory;
pub mod partial_result_factory;
pub mod schema_factory;

pub use field_data_factory::FieldDataFactory;
pub use partial_result_factory::PartialResultFactory;
pub use schema_factory::SchemaFactory;

#[cfg(test)]
mod field_data_factory_test;
#[cfg(test)]
mod partial_result_factory_test;
