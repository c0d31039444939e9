use crate::engine::core::column::{AggregationResult, FieldData};
use crate::engine::core::read::aggregate::group_key::GroupKeyCodec;
use crate::engine::core::read::aggregate::plan::AggregatePlan;
use crate::engine::errors::ReduceError;
use crate::engine::schema::DataType;

/// A partial result with the columns the reduce needs, resolved and checked.
#[derive(Debug)]
pub struct BoundPartial<'a> {
    pub(crate) row_count: usize,
    pub(crate) group_columns: Vec<&'a FieldData>,
    pub(crate) agg_columns: Vec<&'a FieldData>,
}

impl<'a> BoundPartial<'a> {
    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

/// Partials bound for one reduce, plus the input type observed per aggregate.
#[derive(Debug)]
pub struct BoundInput<'a> {
    pub partials: Vec<BoundPartial<'a>>,
    pub agg_input_types: Vec<DataType>,
}

impl<'a> BoundInput<'a> {
    pub fn total_rows(&self) -> usize {
        self.partials.iter().map(|p| p.row_count).sum()
    }
}

fn lookup<'a>(
    partial: &'a AggregationResult,
    index: usize,
    field_id: i64,
) -> Result<&'a FieldData, ReduceError> {
    let col = partial.field(field_id).ok_or_else(|| {
        ReduceError::SchemaMismatch(format!(
            "partial result {} lacks field {}",
            index, field_id
        ))
    })?;
    col.check_shape(partial.row_count())?;
    Ok(col)
}

/// Resolves and validates every partial before any row is processed, so a
/// doomed reduce fails without doing partial work.
pub fn bind_partials<'a>(
    partials: &'a [AggregationResult],
    codec: &GroupKeyCodec,
    plan: &AggregatePlan,
) -> Result<BoundInput<'a>, ReduceError> {
    let mut observed: Vec<Option<DataType>> = vec![None; plan.len()];
    let mut bound = Vec::with_capacity(partials.len());

    for (index, partial) in partials.iter().enumerate() {
        let mut group_columns = Vec::with_capacity(codec.len());
        for field in codec.fields() {
            let col = lookup(partial, index, field.field_id)?;
            if col.data_type != field.data_type {
                return Err(ReduceError::SchemaMismatch(format!(
                    "partial result {}: group-by field {} is {}, schema declares {}",
                    index, field.field_id, col.data_type, field.data_type
                )));
            }
            group_columns.push(col);
        }

        let mut agg_columns = Vec::with_capacity(plan.len());
        for (slot, agg) in plan.aggregates.iter().enumerate() {
            let col = lookup(partial, index, agg.field_id)?;
            if !agg.accepts(col.data_type) {
                return Err(ReduceError::SchemaMismatch(format!(
                    "partial result {}: field {} is {}, schema declares {}",
                    index, agg.field_id, col.data_type, agg.schema_type
                )));
            }
            match observed[slot] {
                Some(seen) if seen != col.data_type => {
                    return Err(ReduceError::SchemaMismatch(format!(
                        "partial results disagree on field {}: {} vs {}",
                        agg.field_id, seen, col.data_type
                    )));
                }
                Some(_) => {}
                None => observed[slot] = Some(col.data_type),
            }
            agg_columns.push(col);
        }

        bound.push(BoundPartial {
            row_count: partial.row_count(),
            group_columns,
            agg_columns,
        });
    }

    let agg_input_types = plan
        .aggregates
        .iter()
        .zip(observed)
        .map(|(agg, seen)| seen.unwrap_or(agg.schema_type))
        .collect();

    Ok(BoundInput {
        partials: bound,
        agg_input_types,
    })
}
