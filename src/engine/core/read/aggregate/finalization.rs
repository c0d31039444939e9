use crate::engine::core::column::{AggregationResult, FieldData, ScalarArray};
use crate::engine::core::read::aggregate::group_key::GroupKeyCodec;
use crate::engine::core::read::aggregate::group_table::GroupTable;
use crate::engine::core::read::aggregate::plan::AggregatePlan;
use crate::engine::errors::ReduceError;
use crate::engine::schema::DataType;
use crate::engine::types::ScalarValue;

/// Accumulates one output column and its validity bitmap.
struct ColumnBuilder {
    field_id: i64,
    name: String,
    data_type: DataType,
    data: ScalarArray,
    valid: Vec<bool>,
    // Emit a bitmap even when every cell is valid
    always_bitmap: bool,
}

impl ColumnBuilder {
    fn new(
        field_id: i64,
        name: String,
        data_type: DataType,
        capacity: usize,
        always_bitmap: bool,
    ) -> Self {
        Self {
            field_id,
            name,
            data_type,
            data: ScalarArray::with_capacity(data_type, capacity),
            valid: Vec::with_capacity(capacity),
            always_bitmap,
        }
    }

    fn push(&mut self, value: Option<ScalarValue>) -> Result<(), ReduceError> {
        self.valid.push(value.is_some());
        self.data
            .push(value)
            .map_err(|reason| ReduceError::malformed(self.field_id, reason))
    }

    fn finish(self) -> FieldData {
        let has_null = self.valid.iter().any(|v| !v);
        let column = FieldData::new(self.field_id, self.data_type, self.data).with_name(self.name);
        if self.always_bitmap || has_null {
            column.with_valid_data(self.valid)
        } else {
            column
        }
    }
}

/// Writes the group table out as one result: group-by columns first, then
/// one column per aggregate, one row per group in table order.
pub fn materialize(
    table: &GroupTable,
    codec: &GroupKeyCodec,
    plan: &AggregatePlan,
    agg_input_types: &[DataType],
) -> Result<AggregationResult, ReduceError> {
    let rows = table.len();

    let mut group_builders: Vec<ColumnBuilder> = codec
        .fields()
        .iter()
        .map(|f| ColumnBuilder::new(f.field_id, f.name.clone(), f.data_type, rows, f.nullable))
        .collect();

    let mut agg_builders: Vec<ColumnBuilder> = plan
        .aggregates
        .iter()
        .zip(agg_input_types)
        .map(|(agg, input)| {
            ColumnBuilder::new(
                agg.field_id,
                agg.output_name.clone(),
                agg.op.output_type(*input),
                rows,
                false,
            )
        })
        .collect();

    for (key, entry) in table.iter() {
        for ((builder, value), field) in group_builders
            .iter_mut()
            .zip(key.values())
            .zip(codec.fields())
        {
            builder.push(value.to_scalar(field.data_type))?;
        }
        for (builder, acc) in agg_builders.iter_mut().zip(entry.accumulators()) {
            builder.push(acc.finalize().into_scalar())?;
        }
    }

    let fields = group_builders
        .into_iter()
        .chain(agg_builders)
        .map(ColumnBuilder::finish)
        .collect();

    Ok(AggregationResult::new(fields, rows))
}
