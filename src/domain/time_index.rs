//! Date-key → position lookup over an ordered series.
//!
//! Built in one pass. When two records normalize to the same key the
//! earlier index wins; later duplicates are counted, not stored.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::date_key::DateKey;
use super::series::Dated;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesIndex {
    positions: HashMap<DateKey, usize>,
    duplicates: Vec<DateKey>,
}

impl TimeSeriesIndex {
    pub fn build<T: Dated>(series: &[T]) -> Self {
        let mut positions = HashMap::with_capacity(series.len());
        let mut duplicates = Vec::new();

        for (i, item) in series.iter().enumerate() {
            match positions.entry(DateKey::normalize(item.date_str())) {
                Entry::Vacant(slot) => {
                    slot.insert(i);
                }
                Entry::Occupied(slot) => duplicates.push(slot.key().clone()),
            }
        }

        if !duplicates.is_empty() {
            tracing::debug!(
                count = duplicates.len(),
                "duplicate date keys after normalization; keeping first occurrence"
            );
        }

        TimeSeriesIndex {
            positions,
            duplicates,
        }
    }

    pub fn get(&self, key: &DateKey) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Normalizes `date` before the lookup.
    pub fn lookup(&self, date: &str) -> Option<usize> {
        self.get(&DateKey::normalize(date))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// Keys that were shadowed by an earlier record, in encounter order.
    pub fn duplicates(&self) -> &[DateKey] {
        &self.duplicates
    }
}

pub fn build_index<T: Dated>(series: &[T]) -> TimeSeriesIndex {
    TimeSeriesIndex::build(series)
}
