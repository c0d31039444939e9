use std::fmt;
use std::str::FromStr;

use crate::engine::errors::ReduceError;
use crate::engine::schema::{CollectionSchema, DataType};

/// Aggregate operations the reducer can merge across shards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateOp {
    /// COUNT of valid values of the target field
    Count,
    /// SUM over a numeric field
    Sum,
    /// AVG over a numeric field, merged as (sum, count)
    Avg,
    /// MIN over an orderable field
    Min,
    /// MAX over an orderable field
    Max,
}

impl AggregateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Count => "count",
            AggregateOp::Sum => "sum",
            AggregateOp::Avg => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
        }
    }

    /// Rejects input types the operation has no meaning for.
    pub fn validate_input(&self, field_id: i64, data_type: DataType) -> Result<(), ReduceError> {
        let ok = match self {
            AggregateOp::Count => true,
            AggregateOp::Sum | AggregateOp::Avg => data_type.is_numeric(),
            AggregateOp::Min | AggregateOp::Max => data_type.is_orderable(),
        };
        if ok {
            Ok(())
        } else {
            Err(ReduceError::TypeMismatch {
                op: self.as_str().to_string(),
                field_id,
                data_type,
            })
        }
    }

    /// Output column type for an input of `input` type.
    pub fn output_type(&self, input: DataType) -> DataType {
        match self {
            AggregateOp::Count => DataType::Int64,
            AggregateOp::Sum => input.widened(),
            AggregateOp::Avg => DataType::Double,
            AggregateOp::Min | AggregateOp::Max => input,
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateOp {
    type Err = ReduceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(AggregateOp::Count),
            "sum" | "total" => Ok(AggregateOp::Sum),
            "avg" | "mean" => Ok(AggregateOp::Avg),
            "min" => Ok(AggregateOp::Min),
            "max" => Ok(AggregateOp::Max),
            other => Err(ReduceError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// Wire codes used by the planning layer.
impl TryFrom<i32> for AggregateOp {
    type Error = ReduceError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AggregateOp::Count),
            1 => Ok(AggregateOp::Sum),
            2 => Ok(AggregateOp::Avg),
            3 => Ok(AggregateOp::Min),
            4 => Ok(AggregateOp::Max),
            other => Err(ReduceError::UnsupportedOperation(format!(
                "operation code {}",
                other
            ))),
        }
    }
}

/// One requested aggregate: operation applied to a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateSpec {
    pub op: AggregateOp,
    pub field_id: i64,
}

impl AggregateSpec {
    pub fn new(op: AggregateOp, field_id: i64) -> Self {
        Self { op, field_id }
    }

    pub fn parse(op: &str, field_id: i64) -> Result<Self, ReduceError> {
        Ok(Self::new(op.parse()?, field_id))
    }

    pub fn from_code(code: i32, field_id: i64) -> Result<Self, ReduceError> {
        Ok(Self::new(AggregateOp::try_from(code)?, field_id))
    }
}

/// An aggregate spec checked against the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAggregate {
    pub op: AggregateOp,
    pub field_id: i64,
    pub output_name: String,
    pub schema_type: DataType,
}

impl ResolvedAggregate {
    /// Partial columns may carry the schema type, or the widened type shards
    /// ship pre-summed values in.
    pub fn accepts(&self, observed: DataType) -> bool {
        observed == self.schema_type || observed == self.schema_type.widened()
    }
}

/// Aggregates of one reduce, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePlan {
    pub aggregates: Vec<ResolvedAggregate>,
}

impl AggregatePlan {
    pub fn resolve(
        specs: &[AggregateSpec],
        schema: &CollectionSchema,
    ) -> Result<Self, ReduceError> {
        let mut aggregates = Vec::with_capacity(specs.len());
        for spec in specs {
            let field = schema.require(spec.field_id)?;
            spec.op.validate_input(field.field_id, field.data_type)?;
            aggregates.push(ResolvedAggregate {
                op: spec.op,
                field_id: field.field_id,
                output_name: format!("{}({})", spec.op, field.name),
                schema_type: field.data_type,
            });
        }
        Ok(Self { aggregates })
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }
}
