use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::errors::ReduceError;

/// Declared scalar type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    VarChar,
    Json,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Bool => "Bool",
            DataType::Int8 => "Int8",
            DataType::Int16 => "Int16",
            DataType::Int32 => "Int32",
            DataType::Int64 => "Int64",
            DataType::Float => "Float",
            DataType::Double => "Double",
            DataType::VarChar => "VarChar",
            DataType::Json => "JSON",
        }
    }

    /// Parse one primitive/alias (e.g., "int" -> Int64, "string" -> VarChar).
    pub fn from_primitive_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Some(DataType::Bool),
            "int8" | "tinyint" => Some(DataType::Int8),
            "int16" | "smallint" => Some(DataType::Int16),
            "int32" => Some(DataType::Int32),
            "int64" | "int" | "integer" | "bigint" => Some(DataType::Int64),
            "float" | "float32" => Some(DataType::Float),
            "double" | "float64" => Some(DataType::Double),
            "varchar" | "string" | "str" | "text" => Some(DataType::VarChar),
            "json" => Some(DataType::Json),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, DataType::Float | DataType::Double)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    /// Types that can form part of a group key.
    pub fn is_groupable(&self) -> bool {
        !matches!(self, DataType::Json)
    }

    /// Types with a meaningful min/max.
    pub fn is_orderable(&self) -> bool {
        self.is_numeric() || matches!(self, DataType::VarChar)
    }

    /// Type a partial sum of this type is accumulated and shipped in.
    pub fn widened(&self) -> DataType {
        if self.is_integer() {
            DataType::Int64
        } else if self.is_floating() {
            DataType::Double
        } else {
            *self
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub field_id: i64,
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub is_primary_key: bool,
}

impl FieldSchema {
    pub fn new(field_id: i64, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            field_id,
            name: name.into(),
            data_type,
            nullable: false,
            is_primary_key: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }
}

/// Field-id keyed schema shared by every partial result of one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSchema {
    fields: Vec<FieldSchema>,
}

impl CollectionSchema {
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self, ReduceError> {
        let mut seen = HashSet::with_capacity(fields.len());
        for f in &fields {
            if !seen.insert(f.field_id) {
                return Err(ReduceError::SchemaMismatch(format!(
                    "field id {} declared more than once",
                    f.field_id
                )));
            }
        }

        let pk_count = fields.iter().filter(|f| f.is_primary_key).count();
        if pk_count > 1 {
            return Err(ReduceError::SchemaMismatch(format!(
                "schema declares {} primary keys, at most one is allowed",
                pk_count
            )));
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, field_id: i64) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }

    pub fn primary_key(&self) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.is_primary_key)
    }

    /// Like `field`, but reports a missing id as a schema mismatch.
    pub fn require(&self, field_id: i64) -> Result<&FieldSchema, ReduceError> {
        self.field(field_id).ok_or_else(|| {
            ReduceError::SchemaMismatch(format!("field {} is not part of the schema", field_id))
        })
    }
}
