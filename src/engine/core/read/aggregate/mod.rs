pub mod binding;
pub mod cancel;
pub mod exact_sum;
pub mod finalization;
pub mod group_key;
pub mod group_table;
pub mod ops;
pub mod plan;
pub mod reducer;

pub use cancel::CancelSignal;
pub use plan::{AggregateOp, AggregateSpec};
pub use reducer::GroupAggReducer;

#[cfg(test)]
mod exact_sum_test;
#[cfg(test)]
mod plan_test;
