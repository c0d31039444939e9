use std::sync::Arc;

use rayon::ThreadPool;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::engine::core::column::AggregationResult;
use crate::engine::core::read::aggregate::binding::{BoundInput, BoundPartial, bind_partials};
use crate::engine::core::read::aggregate::cancel::CancelSignal;
use crate::engine::core::read::aggregate::finalization::materialize;
use crate::engine::core::read::aggregate::group_key::GroupKeyCodec;
use crate::engine::core::read::aggregate::group_table::GroupTable;
use crate::engine::core::read::aggregate::ops::AccumulatorImpl;
use crate::engine::core::read::aggregate::plan::{AggregatePlan, AggregateSpec};
use crate::engine::errors::ReduceError;
use crate::engine::schema::CollectionSchema;
use crate::shared::config::ReduceConfig;

/// Merges per-shard partial aggregation results into one final result.
///
/// A reducer is built once per query and holds only its configuration; every
/// `reduce` call builds and discards its own group table.
#[derive(Debug, Clone)]
pub struct GroupAggReducer {
    group_by: Vec<i64>,
    specs: Vec<AggregateSpec>,
    codec: GroupKeyCodec,
    plan: AggregatePlan,
    max_groups: i64,
    schema: Arc<CollectionSchema>,
    config: ReduceConfig,
    // Dedicated workers when `config.parallelism > 0`, built once per config
    pool: Option<Arc<ThreadPool>>,
}

impl GroupAggReducer {
    /// Validates the group-by fields and aggregates against `schema`.
    /// `max_groups < 0` means unbounded.
    pub fn new(
        group_by: Vec<i64>,
        aggregates: Vec<AggregateSpec>,
        max_groups: i64,
        schema: Arc<CollectionSchema>,
    ) -> Result<Self, ReduceError> {
        let codec = GroupKeyCodec::new(&group_by, &schema)?;
        let plan = AggregatePlan::resolve(&aggregates, &schema)?;
        Ok(Self {
            group_by,
            specs: aggregates,
            codec,
            plan,
            max_groups,
            schema,
            config: ReduceConfig::default(),
            pool: None,
        })
    }

    /// Like `new`, with the group cap taken from `config.default_max_groups`.
    pub fn from_config(
        group_by: Vec<i64>,
        aggregates: Vec<AggregateSpec>,
        schema: Arc<CollectionSchema>,
        config: ReduceConfig,
    ) -> Result<Self, ReduceError> {
        let max_groups = config.default_max_groups;
        Ok(Self::new(group_by, aggregates, max_groups, schema)?.with_config(config))
    }

    pub fn with_config(mut self, config: ReduceConfig) -> Self {
        self.pool = build_pool(config.parallelism);
        self.config = config;
        self
    }

    pub fn group_by(&self) -> &[i64] {
        &self.group_by
    }

    pub fn aggregates(&self) -> &[AggregateSpec] {
        &self.specs
    }

    pub fn max_groups(&self) -> i64 {
        self.max_groups
    }

    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    /// Threads `reduce_parallel` spreads work over.
    pub fn worker_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Reduces `partials` sequentially, in input order.
    pub fn reduce(
        &self,
        partials: &[AggregationResult],
        cancel: &CancelSignal,
    ) -> Result<AggregationResult, ReduceError> {
        self.run(partials, cancel, false)
            .inspect_err(|e| e.log_error())
    }

    /// Reduces `partials` with one group table per worker, then folds the
    /// worker tables in input order. Output matches `reduce`.
    pub fn reduce_parallel(
        &self,
        partials: &[AggregationResult],
        cancel: &CancelSignal,
    ) -> Result<AggregationResult, ReduceError> {
        self.run(partials, cancel, true)
            .inspect_err(|e| e.log_error())
    }

    fn run(
        &self,
        partials: &[AggregationResult],
        cancel: &CancelSignal,
        parallel: bool,
    ) -> Result<AggregationResult, ReduceError> {
        cancel.check()?;
        let input = bind_partials(partials, &self.codec, &self.plan)?;

        debug!(
            target: "group_reduce::reducer",
            partials = input.partials.len(),
            rows = input.total_rows(),
            group_by = self.codec.len(),
            aggregates = self.plan.len(),
            parallel,
            "Starting reduce"
        );

        let mut table = if parallel && input.partials.len() >= self.config.parallel_min_partials {
            self.accumulate_parallel(&input, cancel)?
        } else {
            let mut table = GroupTable::new();
            self.accumulate(&mut table, &input.partials, cancel)?;
            table
        };

        if self.max_groups >= 0 && table.len() as i64 > self.max_groups {
            info!(
                target: "group_reduce::reducer",
                groups = table.len(),
                max_groups = self.max_groups,
                "Truncating groups to limit"
            );
            table.truncate(self.max_groups as usize);
        }

        cancel.check()?;
        let result = materialize(&table, &self.codec, &self.plan, &input.agg_input_types)?;

        debug!(
            target: "group_reduce::reducer",
            groups = result.row_count(),
            "Reduce finished"
        );
        Ok(result)
    }

    fn new_accumulators(&self) -> Vec<AccumulatorImpl> {
        self.plan
            .aggregates
            .iter()
            .map(AccumulatorImpl::from_resolved)
            .collect()
    }

    /// Feeds every row of `partials` into `table`, checking `cancel` between
    /// partials and every `cancel_check_rows` rows.
    fn accumulate(
        &self,
        table: &mut GroupTable,
        partials: &[BoundPartial<'_>],
        cancel: &CancelSignal,
    ) -> Result<(), ReduceError> {
        let check_every = self.config.cancel_check_rows.max(1);

        for partial in partials {
            cancel.check()?;
            for row in 0..partial.row_count {
                if row > 0 && row % check_every == 0 {
                    cancel.check()?;
                }
                let key = self.codec.encode(&partial.group_columns, row)?;
                let entry = table.lookup_or_create(key, || self.new_accumulators());
                for (acc, col) in entry
                    .accumulators_mut()
                    .iter_mut()
                    .zip(partial.agg_columns.iter())
                {
                    acc.update(col, row)?;
                }
            }
        }
        Ok(())
    }

    fn accumulate_parallel(
        &self,
        input: &BoundInput<'_>,
        cancel: &CancelSignal,
    ) -> Result<GroupTable, ReduceError> {
        let chunk_size = input
            .partials
            .len()
            .div_ceil(self.worker_threads().max(1))
            .max(1);

        let build = || -> Result<Vec<GroupTable>, ReduceError> {
            input
                .partials
                .par_chunks(chunk_size)
                .map(|chunk| {
                    let mut table = GroupTable::new();
                    self.accumulate(&mut table, chunk, cancel)?;
                    Ok(table)
                })
                .collect()
        };

        let tables = match &self.pool {
            Some(pool) => pool.install(build)?,
            None => build()?,
        };

        debug!(
            target: "group_reduce::reducer",
            workers = tables.len(),
            chunk_size,
            "Merging worker tables"
        );

        // Chunk order is input order, so first-seen order survives the merge.
        let mut merged = GroupTable::new();
        for table in tables {
            cancel.check()?;
            merged.merge_from(table)?;
        }
        Ok(merged)
    }
}

fn build_pool(parallelism: usize) -> Option<Arc<ThreadPool>> {
    if parallelism == 0 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism)
        .thread_name(|i| format!("group-reduce-{}", i))
        .build()
    {
        Ok(pool) => Some(Arc::new(pool)),
        Err(e) => {
            warn!(
                target: "group_reduce::reducer",
                error = %e,
                parallelism,
                "Thread pool unavailable, using global pool"
            );
            None
        }
    }
}
