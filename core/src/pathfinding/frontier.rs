use crate::error::{SearchError, SearchResult};
use crate::graph::Weight;
use std::collections::BTreeMap;

/// A popped frontier entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry<V> {
    pub vertex: V,
    pub priority: Weight,
}

/// Handle to one live frontier entry, returned by `insert` and
/// `decrease_key`. Orders by priority, then insertion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrontierKey {
    priority: Weight,
    sequence: u64,
}

impl FrontierKey {
    pub fn priority(&self) -> Weight {
        self.priority
    }
}

/// Min-priority structure over `(vertex, priority)` pairs.
///
/// Equal priorities pop in insertion order. Decrease-key removes the entry
/// by its exact [`FrontierKey`] and reinserts, O(log n) however many entries
/// share a priority. The frontier keeps no vertex index; the caller holds
/// the key of each live entry.
#[derive(Debug, Clone)]
pub struct Frontier<V> {
    entries: BTreeMap<FrontierKey, V>,
    next_sequence: u64,
}

impl<V: PartialEq + std::fmt::Debug> Frontier<V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    pub fn insert(&mut self, vertex: V, priority: Weight) -> FrontierKey {
        let key = FrontierKey {
            priority,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.entries.insert(key, vertex);
        key
    }

    pub fn extract_min(&mut self) -> SearchResult<FrontierEntry<V>> {
        self.entries
            .pop_first()
            .map(|(key, vertex)| FrontierEntry {
                vertex,
                priority: key.priority,
            })
            .ok_or(SearchError::EmptyFrontier)
    }

    pub fn peek_min(&self) -> Option<(&V, Weight)> {
        self.entries
            .first_key_value()
            .map(|(key, vertex)| (vertex, key.priority))
    }

    /// Replaces the entry under `old_key` with `(vertex, new_priority)` and
    /// returns the new key. A stale `old_key` removes nothing.
    pub fn decrease_key(
        &mut self,
        vertex: V,
        old_key: FrontierKey,
        new_priority: Weight,
    ) -> FrontierKey {
        match self.entries.remove(&old_key) {
            Some(previous) if previous == vertex => {}
            Some(previous) => {
                tracing::debug!(?previous, ?vertex, "frontier key belonged to another vertex");
                self.entries.insert(old_key, previous);
            }
            None => tracing::debug!(?vertex, ?old_key, "no live frontier entry for key"),
        }
        self.insert(vertex, new_priority)
    }

    pub fn contains_key(&self, key: &FrontierKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Scans entries at `priority` for `vertex`.
    pub fn contains(&self, vertex: &V, priority: Weight) -> bool {
        let low = FrontierKey {
            priority,
            sequence: 0,
        };
        let high = FrontierKey {
            priority,
            sequence: u64::MAX,
        };
        self.entries
            .range(low..=high)
            .any(|(_, candidate)| candidate == vertex)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: PartialEq + std::fmt::Debug> Default for Frontier<V> {
    fn default() -> Self {
        Self::new()
    }
}
