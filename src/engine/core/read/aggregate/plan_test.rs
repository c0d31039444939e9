use crate::engine::core::read::aggregate::plan::{AggregateOp, AggregatePlan, AggregateSpec};
use crate::engine::errors::ReduceError;
use crate::engine::schema::DataType;
use crate::test_helpers::factories::SchemaFactory;

#[test]
fn parses_names_and_aliases() {
    assert_eq!("count".parse::<AggregateOp>().unwrap(), AggregateOp::Count);
    assert_eq!("SUM".parse::<AggregateOp>().unwrap(), AggregateOp::Sum);
    assert_eq!("total".parse::<AggregateOp>().unwrap(), AggregateOp::Sum);
    assert_eq!(" mean ".parse::<AggregateOp>().unwrap(), AggregateOp::Avg);
    assert_eq!("max".parse::<AggregateOp>().unwrap(), AggregateOp::Max);
}

#[test]
fn unknown_operation_is_rejected_at_spec_construction() {
    let err = AggregateSpec::parse("median", 102).unwrap_err();
    assert_eq!(err, ReduceError::UnsupportedOperation("median".into()));

    let err = AggregateSpec::from_code(42, 102).unwrap_err();
    assert!(matches!(err, ReduceError::UnsupportedOperation(_)));
}

#[test]
fn wire_codes_map_to_operations() {
    let ops: Vec<AggregateOp> = (0..5i32).map(|c| AggregateOp::try_from(c).unwrap()).collect();
    assert_eq!(
        ops,
        vec![
            AggregateOp::Count,
            AggregateOp::Sum,
            AggregateOp::Avg,
            AggregateOp::Min,
            AggregateOp::Max
        ]
    );
}

#[test]
fn output_types_per_operation() {
    assert_eq!(AggregateOp::Count.output_type(DataType::VarChar), DataType::Int64);
    assert_eq!(AggregateOp::Sum.output_type(DataType::Int32), DataType::Int64);
    assert_eq!(AggregateOp::Sum.output_type(DataType::Float), DataType::Double);
    assert_eq!(AggregateOp::Avg.output_type(DataType::Int8), DataType::Double);
    assert_eq!(AggregateOp::Min.output_type(DataType::Int16), DataType::Int16);
    assert_eq!(AggregateOp::Max.output_type(DataType::VarChar), DataType::VarChar);
}

#[test]
fn resolve_checks_type_compatibility() {
    let schema = SchemaFactory::metrics_schema();

    let plan = AggregatePlan::resolve(
        &[
            AggregateSpec::new(AggregateOp::Sum, 4),
            AggregateSpec::new(AggregateOp::Min, 2),
            AggregateSpec::new(AggregateOp::Count, 7),
        ],
        &schema,
    )
    .unwrap();
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.aggregates[0].output_name, "sum(amount)");
    assert_eq!(plan.aggregates[1].schema_type, DataType::VarChar);

    let err = AggregatePlan::resolve(&[AggregateSpec::new(AggregateOp::Max, 6)], &schema)
        .unwrap_err();
    assert_eq!(
        err,
        ReduceError::TypeMismatch {
            op: "max".into(),
            field_id: 6,
            data_type: DataType::Bool
        }
    );

    let err = AggregatePlan::resolve(&[AggregateSpec::new(AggregateOp::Avg, 2)], &schema)
        .unwrap_err();
    assert!(matches!(err, ReduceError::TypeMismatch { .. }));
}

#[test]
fn resolve_rejects_unknown_field() {
    let schema = SchemaFactory::metrics_schema();
    let err = AggregatePlan::resolve(&[AggregateSpec::new(AggregateOp::Sum, 99)], &schema)
        .unwrap_err();
    assert!(matches!(err, ReduceError::SchemaMismatch(_)));
}

#[test]
fn accepts_schema_or_widened_type() {
    let schema = SchemaFactory::nullable_group_schema();
    let plan =
        AggregatePlan::resolve(&[AggregateSpec::new(AggregateOp::Sum, 102)], &schema).unwrap();
    let agg = &plan.aggregates[0];
    assert!(agg.accepts(DataType::Int32));
    assert!(agg.accepts(DataType::Int64));
    assert!(!agg.accepts(DataType::Double));
}
