use thiserror::Error;
use tracing::{debug, error, warn};

use crate::engine::schema::DataType;

/// Errors that can occur while reducing partial aggregation results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReduceError {
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Unsupported group-by type {data_type} for field {field_id}")]
    UnsupportedType { field_id: i64, data_type: DataType },

    #[error("Unsupported aggregate operation: {0}")]
    UnsupportedOperation(String),

    #[error("Aggregate {op} cannot be applied to field {field_id} of type {data_type}")]
    TypeMismatch {
        op: String,
        field_id: i64,
        data_type: DataType,
    },

    #[error("Malformed column for field {field_id}: {reason}")]
    MalformedColumn { field_id: i64, reason: String },

    #[error("Integer overflow while summing field {field_id}")]
    Overflow { field_id: i64 },

    #[error("Reduce cancelled before completion")]
    Cancelled,
}

impl ReduceError {
    pub(crate) fn malformed(field_id: i64, reason: impl Into<String>) -> Self {
        ReduceError::MalformedColumn {
            field_id,
            reason: reason.into(),
        }
    }

    pub fn log_error(&self) {
        match self {
            ReduceError::SchemaMismatch(msg) => {
                error!("Schema mismatch: {}", msg);
                debug!("Schema mismatch details: {:?}", self);
            }
            ReduceError::UnsupportedType {
                field_id,
                data_type,
            } => {
                error!("Unsupported group-by type {} on field {}", data_type, field_id);
                debug!("Unsupported type details: {:?}", self);
            }
            ReduceError::UnsupportedOperation(op) => {
                error!("Unsupported aggregate operation: {}", op);
            }
            ReduceError::TypeMismatch { op, field_id, .. } => {
                error!("Aggregate {} rejected for field {}", op, field_id);
                debug!("Type mismatch details: {:?}", self);
            }
            ReduceError::MalformedColumn { field_id, reason } => {
                error!("Malformed column for field {}: {}", field_id, reason);
            }
            ReduceError::Overflow { field_id } => {
                error!("Integer overflow while summing field {}", field_id);
            }
            ReduceError::Cancelled => {
                warn!("Reduce was cancelled");
            }
        }
    }
}
