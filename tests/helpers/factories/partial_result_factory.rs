use crate::engine::core::column::{AggregationResult, FieldData};

use super::field_data_factory::FieldDataFactory;

/// Builds one shard's partial result column by column.
pub struct PartialResultFactory {
    columns: Vec<FieldData>,
    row_count: Option<usize>,
}

impl PartialResultFactory {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            row_count: None,
        }
    }

    pub fn with_column(mut self, column: FieldData) -> Self {
        self.columns.push(column);
        self
    }

    /// Declared row count; defaults to the first column's length.
    pub fn with_row_count(mut self, rows: usize) -> Self {
        self.row_count = Some(rows);
        self
    }

    pub fn create(self) -> AggregationResult {
        let rows = self
            .row_count
            .unwrap_or_else(|| self.columns.first().map(|c| c.len()).unwrap_or(0));
        AggregationResult::new(self.columns, rows)
    }

    /// `(group, value)` rows for a nullable string key (`None` = NULL) and an
    /// i64 value, with the empty string stored as the NULL placeholder.
    pub fn string_key_rows(
        key_field: i64,
        value_field: i64,
        rows: &[(Option<&str>, i64)],
    ) -> AggregationResult {
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.unwrap_or("")).collect();
        let valid: Vec<bool> = rows.iter().map(|(k, _)| k.is_some()).collect();
        let values: Vec<i64> = rows.iter().map(|(_, v)| *v).collect();
        Self::new()
            .with_column(
                FieldDataFactory::strings(key_field, &keys)
                    .with_name("c1")
                    .with_validity(&valid)
                    .create(),
            )
            .with_column(FieldDataFactory::longs(value_field, &values).create())
            .create()
    }
}
