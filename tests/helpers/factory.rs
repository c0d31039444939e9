pub use super::factories::{FieldDataFactory, PartialResultFactory, SchemaFactory};

pub struct Factory;

impl Factory {
    pub fn schema() -> SchemaFactory {
        SchemaFactory::new()
    }

    pub fn partial() -> PartialResultFactory {
        PartialResultFactory::new()
    }
}
