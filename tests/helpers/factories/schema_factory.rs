use std::sync::Arc;

use crate::engine::schema::{CollectionSchema, DataType, FieldSchema};

pub struct SchemaFactory {
    fields: Vec<FieldSchema>,
}

impl SchemaFactory {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn with_field(mut self, field_id: i64, name: &str, data_type: DataType) -> Self {
        self.fields.push(FieldSchema::new(field_id, name, data_type));
        self
    }

    pub fn with_nullable_field(mut self, field_id: i64, name: &str, data_type: DataType) -> Self {
        self.fields
            .push(FieldSchema::new(field_id, name, data_type).nullable());
        self
    }

    pub fn with_primary_key(mut self, field_id: i64, name: &str, data_type: DataType) -> Self {
        self.fields
            .push(FieldSchema::new(field_id, name, data_type).primary_key());
        self
    }

    pub fn create(self) -> Arc<CollectionSchema> {
        Arc::new(CollectionSchema::new(self.fields).expect("valid test schema"))
    }

    /// pk (100, VarChar), c1 (101, nullable VarChar), c3 (102, Int32)
    pub fn nullable_group_schema() -> Arc<CollectionSchema> {
        Self::new()
            .with_primary_key(100, "pk", DataType::VarChar)
            .with_nullable_field(101, "c1", DataType::VarChar)
            .with_field(102, "c3", DataType::Int32)
            .create()
    }

    /// Mixed schema used by multi-key and per-type tests.
    pub fn metrics_schema() -> Arc<CollectionSchema> {
        Self::new()
            .with_primary_key(1, "id", DataType::Int64)
            .with_nullable_field(2, "region", DataType::VarChar)
            .with_field(3, "tier", DataType::Int32)
            .with_nullable_field(4, "amount", DataType::Int64)
            .with_nullable_field(5, "price", DataType::Double)
            .with_field(6, "active", DataType::Bool)
            .with_field(7, "payload", DataType::Json)
            .with_nullable_field(8, "ratio", DataType::Float)
            .create()
    }
}
