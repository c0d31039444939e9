use ahash::RandomState as AHashRandomState;
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::engine::core::read::aggregate::group_key::GroupKey;
use crate::engine::core::read::aggregate::ops::AccumulatorImpl;
use crate::engine::errors::ReduceError;

/// Per-group state: one accumulator per requested aggregate, by position.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    accumulators: Vec<AccumulatorImpl>,
}

impl GroupEntry {
    pub fn new(accumulators: Vec<AccumulatorImpl>) -> Self {
        Self { accumulators }
    }

    pub fn accumulators(&self) -> &[AccumulatorImpl] {
        &self.accumulators
    }

    pub fn accumulators_mut(&mut self) -> &mut [AccumulatorImpl] {
        &mut self.accumulators
    }

    pub fn merge(&mut self, other: &GroupEntry) -> Result<(), ReduceError> {
        if self.accumulators.len() != other.accumulators.len() {
            return Err(ReduceError::SchemaMismatch(format!(
                "group entries carry {} and {} aggregates",
                self.accumulators.len(),
                other.accumulators.len()
            )));
        }
        for (a, b) in self.accumulators.iter_mut().zip(other.accumulators.iter()) {
            a.merge(b)?;
        }
        Ok(())
    }
}

/// Insertion-ordered map from group key to group entry.
///
/// Iteration order is first-seen order; entries are never removed while the
/// table is being populated.
#[derive(Debug, Clone, Default)]
pub struct GroupTable {
    groups: IndexMap<GroupKey, GroupEntry, AHashRandomState>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self {
            groups: IndexMap::with_hasher(AHashRandomState::new()),
        }
    }

    /// Returns the entry for `key`, creating it with `make` on first sight.
    pub fn lookup_or_create<F>(&mut self, key: GroupKey, make: F) -> &mut GroupEntry
    where
        F: FnOnce() -> Vec<AccumulatorImpl>,
    {
        self.groups
            .entry(key)
            .or_insert_with(|| GroupEntry::new(make()))
    }

    pub fn get(&self, key: &GroupKey) -> Option<&GroupEntry> {
        self.groups.get(key)
    }

    pub fn for_each_in_order<F>(&self, mut f: F)
    where
        F: FnMut(&GroupKey, &GroupEntry),
    {
        for (k, e) in &self.groups {
            f(k, e);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &GroupEntry)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Keeps the first `max` groups in insertion order.
    pub fn truncate(&mut self, max: usize) {
        self.groups.truncate(max);
    }

    /// Folds `other` into this table, visiting its groups in its own order.
    /// New keys are appended after the existing ones.
    pub fn merge_from(&mut self, other: GroupTable) -> Result<(), ReduceError> {
        for (key, entry) in other.groups {
            match self.groups.entry(key) {
                Entry::Vacant(e) => {
                    e.insert(entry);
                }
                Entry::Occupied(mut e) => {
                    e.get_mut().merge(&entry)?;
                }
            }
        }
        Ok(())
    }
}
