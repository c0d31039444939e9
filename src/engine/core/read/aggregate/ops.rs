use std::cmp::Ordering;

use crate::engine::core::column::FieldData;
use crate::engine::core::read::aggregate::exact_sum::ExactSum;
use crate::engine::core::read::aggregate::plan::{AggregateOp, ResolvedAggregate};
use crate::engine::errors::ReduceError;
use crate::engine::schema::DataType;
use crate::engine::types::ScalarValue;

fn add_checked(acc: &mut i64, v: i64) -> bool {
    match acc.checked_add(v) {
        Some(sum) => {
            *acc = sum;
            true
        }
        None => false,
    }
}

/// Running sum, kept in the widened type of its input.
#[derive(Debug, Clone, PartialEq)]
pub enum SumValue {
    Int(i64),
    Float(ExactSum),
}

impl SumValue {
    pub fn zero_for(data_type: DataType) -> Self {
        if data_type.is_floating() {
            SumValue::Float(ExactSum::new())
        } else {
            SumValue::Int(0)
        }
    }

    /// Reads `row` of `column` in this sum's own domain and adds it.
    fn add_row(&mut self, column: &FieldData, row: usize, field_id: i64) -> Result<(), ReduceError> {
        let added = match self {
            SumValue::Int(acc) => column.i64_at(row).map(|v| add_checked(acc, v)),
            SumValue::Float(acc) => column.f64_at(row).map(|v| acc.add(v)),
        };
        match added {
            Some(true) => Ok(()),
            Some(false) => Err(ReduceError::Overflow { field_id }),
            None => Err(ReduceError::malformed(
                column.field_id,
                format!("row {} has no numeric value in a {} array", row, column.data.kind()),
            )),
        }
    }

    fn merge(&mut self, other: &SumValue, field_id: i64) -> Result<(), ReduceError> {
        let merged = match (&mut *self, other) {
            (SumValue::Int(a), SumValue::Int(b)) => add_checked(a, *b),
            (SumValue::Float(a), SumValue::Float(b)) => a.merge(b),
            (a, b) => {
                return Err(ReduceError::SchemaMismatch(format!(
                    "field {}: cannot add {:?} to {:?}",
                    field_id, b, a
                )));
            }
        };
        if merged {
            Ok(())
        } else {
            Err(ReduceError::Overflow { field_id })
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            SumValue::Int(v) => *v as f64,
            SumValue::Float(v) => v.value(),
        }
    }

    pub fn to_scalar(&self) -> ScalarValue {
        match self {
            SumValue::Int(v) => ScalarValue::Int64(*v),
            SumValue::Float(v) => ScalarValue::Float64(v.value()),
        }
    }
}

/// Finalized output of an accumulator
#[derive(Debug, Clone, PartialEq)]
pub enum AggOutput {
    Count(i64),
    Sum(Option<ScalarValue>),
    Min(Option<ScalarValue>),
    Max(Option<ScalarValue>),
    Avg(Option<f64>),
}

impl AggOutput {
    /// Output cell; `None` marks the cell invalid.
    pub fn into_scalar(self) -> Option<ScalarValue> {
        match self {
            AggOutput::Count(c) => Some(ScalarValue::Int64(c)),
            AggOutput::Sum(v) | AggOutput::Min(v) | AggOutput::Max(v) => v,
            AggOutput::Avg(v) => v.map(ScalarValue::Float64),
        }
    }
}

/// Accumulator enum with concrete implementations per operation
#[derive(Debug, Clone, PartialEq)]
pub enum AccumulatorImpl {
    Count(Count),
    Sum(Sum),
    Min(Min),
    Max(Max),
    Avg(Avg),
}

impl AccumulatorImpl {
    pub fn from_spec(op: AggregateOp, field_id: i64, input: DataType) -> Self {
        match op {
            AggregateOp::Count => Self::Count(Count::new(field_id)),
            AggregateOp::Sum => Self::Sum(Sum::new(field_id, input)),
            AggregateOp::Avg => Self::Avg(Avg::new(field_id, input)),
            AggregateOp::Min => Self::Min(Min::new(field_id)),
            AggregateOp::Max => Self::Max(Max::new(field_id)),
        }
    }

    pub fn from_resolved(agg: &ResolvedAggregate) -> Self {
        Self::from_spec(agg.op, agg.field_id, agg.schema_type)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AccumulatorImpl::Count(_) => "count",
            AccumulatorImpl::Sum(_) => "sum",
            AccumulatorImpl::Min(_) => "min",
            AccumulatorImpl::Max(_) => "max",
            AccumulatorImpl::Avg(_) => "avg",
        }
    }

    /// Feed one row of the aggregate's target column.
    #[inline]
    pub fn update(&mut self, column: &FieldData, row: usize) -> Result<(), ReduceError> {
        match self {
            AccumulatorImpl::Count(a) => {
                a.update(column, row);
                Ok(())
            }
            AccumulatorImpl::Sum(a) => a.update(column, row),
            AccumulatorImpl::Min(a) => a.update(column, row),
            AccumulatorImpl::Max(a) => a.update(column, row),
            AccumulatorImpl::Avg(a) => a.update(column, row),
        }
    }

    /// Merge another accumulator of the same variant
    pub fn merge(&mut self, other: &AccumulatorImpl) -> Result<(), ReduceError> {
        match (self, other) {
            (AccumulatorImpl::Count(a), AccumulatorImpl::Count(b)) => {
                a.merge(b);
                Ok(())
            }
            (AccumulatorImpl::Sum(a), AccumulatorImpl::Sum(b)) => a.merge(b),
            (AccumulatorImpl::Min(a), AccumulatorImpl::Min(b)) => {
                a.merge(b);
                Ok(())
            }
            (AccumulatorImpl::Max(a), AccumulatorImpl::Max(b)) => {
                a.merge(b);
                Ok(())
            }
            (AccumulatorImpl::Avg(a), AccumulatorImpl::Avg(b)) => a.merge(b),
            (a, b) => Err(ReduceError::SchemaMismatch(format!(
                "cannot merge {} accumulator into {}",
                b.name(),
                a.name()
            ))),
        }
    }

    pub fn finalize(&self) -> AggOutput {
        match self {
            AccumulatorImpl::Count(a) => a.finalize(),
            AccumulatorImpl::Sum(a) => a.finalize(),
            AccumulatorImpl::Min(a) => a.finalize(),
            AccumulatorImpl::Max(a) => a.finalize(),
            AccumulatorImpl::Avg(a) => a.finalize(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Count {
    pub field_id: i64,
    count: i64,
}

impl Count {
    pub fn new(field_id: i64) -> Self {
        Self { field_id, count: 0 }
    }

    #[inline]
    pub fn update(&mut self, column: &FieldData, row: usize) {
        if column.is_valid(row) {
            self.count += 1;
        }
    }

    #[inline]
    pub fn merge(&mut self, other: &Count) {
        self.count += other.count;
    }

    pub fn finalize(&self) -> AggOutput {
        AggOutput::Count(self.count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sum {
    pub field_id: i64,
    sum: SumValue,
    // Any valid input seen; SUM over no valid rows is NULL
    seen: bool,
}

impl Sum {
    pub fn new(field_id: i64, input: DataType) -> Self {
        Self {
            field_id,
            sum: SumValue::zero_for(input),
            seen: false,
        }
    }

    pub fn update(&mut self, column: &FieldData, row: usize) -> Result<(), ReduceError> {
        if !column.is_valid(row) {
            return Ok(());
        }
        self.sum.add_row(column, row, self.field_id)?;
        self.seen = true;
        Ok(())
    }

    #[inline]
    pub fn merge(&mut self, other: &Sum) -> Result<(), ReduceError> {
        self.sum.merge(&other.sum, self.field_id)?;
        self.seen |= other.seen;
        Ok(())
    }

    pub fn finalize(&self) -> AggOutput {
        AggOutput::Sum(self.seen.then(|| self.sum.to_scalar()))
    }
}

/// Replaces `current` when `candidate` orders as `wanted` against it.
fn keep_extremum(current: &mut Option<ScalarValue>, candidate: &ScalarValue, wanted: Ordering) {
    let replace = match current.as_ref() {
        Some(cur) => candidate.compare(cur) == wanted,
        None => true,
    };
    if replace {
        *current = Some(candidate.clone());
    }
}

fn read_scalar(column: &FieldData, row: usize) -> Result<ScalarValue, ReduceError> {
    column.scalar_at(row).ok_or_else(|| {
        ReduceError::malformed(
            column.field_id,
            format!("row {} is not readable from a {} array", row, column.data.kind()),
        )
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Min {
    pub field_id: i64,
    value: Option<ScalarValue>,
}

impl Min {
    pub fn new(field_id: i64) -> Self {
        Self {
            field_id,
            value: None,
        }
    }

    pub fn update(&mut self, column: &FieldData, row: usize) -> Result<(), ReduceError> {
        if column.is_valid(row) {
            let v = read_scalar(column, row)?;
            keep_extremum(&mut self.value, &v, Ordering::Less);
        }
        Ok(())
    }

    pub fn merge(&mut self, other: &Min) {
        if let Some(v) = &other.value {
            keep_extremum(&mut self.value, v, Ordering::Less);
        }
    }

    pub fn finalize(&self) -> AggOutput {
        AggOutput::Min(self.value.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Max {
    pub field_id: i64,
    value: Option<ScalarValue>,
}

impl Max {
    pub fn new(field_id: i64) -> Self {
        Self {
            field_id,
            value: None,
        }
    }

    pub fn update(&mut self, column: &FieldData, row: usize) -> Result<(), ReduceError> {
        if column.is_valid(row) {
            let v = read_scalar(column, row)?;
            keep_extremum(&mut self.value, &v, Ordering::Greater);
        }
        Ok(())
    }

    pub fn merge(&mut self, other: &Max) {
        if let Some(v) = &other.value {
            keep_extremum(&mut self.value, v, Ordering::Greater);
        }
    }

    pub fn finalize(&self) -> AggOutput {
        AggOutput::Max(self.value.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Avg {
    pub field_id: i64,
    sum: SumValue,
    count: i64,
}

impl Avg {
    pub fn new(field_id: i64, input: DataType) -> Self {
        Self {
            field_id,
            sum: SumValue::zero_for(input),
            count: 0,
        }
    }

    pub fn update(&mut self, column: &FieldData, row: usize) -> Result<(), ReduceError> {
        if !column.is_valid(row) {
            return Ok(());
        }
        self.sum.add_row(column, row, self.field_id)?;
        self.count += 1;
        Ok(())
    }

    #[inline]
    pub fn merge(&mut self, other: &Avg) -> Result<(), ReduceError> {
        self.sum.merge(&other.sum, self.field_id)?;
        self.count += other.count;
        Ok(())
    }

    /// Sum and count without finalizing, for merging across shards
    pub fn sum_count(&self) -> (&SumValue, i64) {
        (&self.sum, self.count)
    }

    pub fn finalize(&self) -> AggOutput {
        if self.count == 0 {
            return AggOutput::Avg(None);
        }
        AggOutput::Avg(Some(self.sum.as_f64() / self.count as f64))
    }
}
