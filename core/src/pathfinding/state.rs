use super::frontier::FrontierKey;
use crate::graph::Weight;
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;

/// Reported distance for vertices the search could not reach.
pub const UNREACHABLE: i64 = -1;

/// Tentative distance; `Infinite` orders after every finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
    Finite(Weight),
    Infinite,
}

impl Distance {
    pub fn finite(&self) -> Option<Weight> {
        match self {
            Distance::Finite(distance) => Some(*distance),
            Distance::Infinite => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    /// Externally reported form: the distance, or [`UNREACHABLE`].
    pub fn reported(&self) -> i64 {
        match self {
            Distance::Finite(distance) => i64::try_from(*distance).unwrap_or(i64::MAX),
            Distance::Infinite => UNREACHABLE,
        }
    }
}

/// Per-invocation bookkeeping for one search run.
#[derive(Debug, Clone)]
pub struct SearchState<V> {
    source: V,
    distances: FxHashMap<V, Distance>,
    predecessors: FxHashMap<V, V>,
    frontier_keys: FxHashMap<V, FrontierKey>,
    settled: FxHashSet<V>,
    reach_order: Vec<V>,
}

impl<V: Clone + Eq + Hash> SearchState<V> {
    pub fn new(source: V, vertices: impl IntoIterator<Item = V>) -> Self {
        let mut distances: FxHashMap<V, Distance> = vertices
            .into_iter()
            .map(|vertex| (vertex, Distance::Infinite))
            .collect();
        distances.insert(source.clone(), Distance::Finite(0));

        Self {
            reach_order: vec![source.clone()],
            source,
            distances,
            predecessors: FxHashMap::default(),
            frontier_keys: FxHashMap::default(),
            settled: FxHashSet::default(),
        }
    }

    pub fn source(&self) -> &V {
        &self.source
    }

    pub fn distance(&self, vertex: &V) -> Distance {
        self.distances
            .get(vertex)
            .copied()
            .unwrap_or(Distance::Infinite)
    }

    /// Records a strictly better distance and its predecessor edge.
    /// Returns false, changing nothing, if `distance` is not an improvement.
    pub fn relax(&mut self, vertex: V, predecessor: V, distance: Weight) -> bool {
        let previous = self.distance(&vertex);
        if Distance::Finite(distance) >= previous {
            return false;
        }
        if !previous.is_finite() {
            self.reach_order.push(vertex.clone());
        }
        self.predecessors.insert(vertex.clone(), predecessor);
        self.distances.insert(vertex, Distance::Finite(distance));
        true
    }

    /// Key of the vertex's live frontier entry, if it has one.
    pub fn frontier_key(&self, vertex: &V) -> Option<FrontierKey> {
        self.frontier_keys.get(vertex).copied()
    }

    pub fn set_frontier_key(&mut self, vertex: V, key: FrontierKey) {
        self.frontier_keys.insert(vertex, key);
    }

    /// Marks a popped vertex as settled and forgets its frontier key.
    pub fn settle(&mut self, vertex: &V) {
        self.frontier_keys.remove(vertex);
        self.settled.insert(vertex.clone());
    }

    pub fn settled_count(&self) -> usize {
        self.settled.len()
    }

    pub fn distances(&self) -> &FxHashMap<V, Distance> {
        &self.distances
    }

    pub fn predecessors(&self) -> &FxHashMap<V, V> {
        &self.predecessors
    }

    /// Finite distances only, as carried by snapshot events.
    pub fn finite_distances(&self) -> FxHashMap<V, Weight> {
        self.distances
            .iter()
            .filter_map(|(vertex, distance)| distance.finite().map(|d| (vertex.clone(), d)))
            .collect()
    }

    /// Vertices in the order they first received a finite distance.
    pub fn reach_order(&self) -> &[V] {
        &self.reach_order
    }

    pub fn into_parts(self) -> (FxHashMap<V, Distance>, FxHashMap<V, V>) {
        (self.distances, self.predecessors)
    }
}
