//! Graph collaborator interface and a plain in-memory adjacency graph.

use rustc_hash::{FxHashMap, FxHashSet};
use std::{fmt::Debug, hash::Hash};

/// Non-negative edge weight.
pub type Weight = u64;

/// Read-only view of a weighted graph as consumed by the search.
///
/// `neighbors` must list each neighbor at most once. The search never mutates
/// the graph and assumes it does not change for the duration of one run.
pub trait Graph {
    type Vertex: Clone + Eq + Hash + Debug;

    fn vertices(&self) -> FxHashSet<Self::Vertex>;

    fn neighbors(&self, vertex: &Self::Vertex) -> Vec<(Self::Vertex, Weight)>;
}

impl<G: Graph + ?Sized> Graph for &G {
    type Vertex = G::Vertex;

    fn vertices(&self) -> FxHashSet<Self::Vertex> {
        (**self).vertices()
    }

    fn neighbors(&self, vertex: &Self::Vertex) -> Vec<(Self::Vertex, Weight)> {
        (**self).neighbors(vertex)
    }
}

/// Adjacency-map graph, directed or undirected.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph<V> {
    adjacency: FxHashMap<V, FxHashMap<V, Weight>>,
    directed: bool,
}

impl<V: Clone + Eq + Hash + Debug> AdjacencyGraph<V> {
    pub fn undirected() -> Self {
        Self {
            adjacency: FxHashMap::default(),
            directed: false,
        }
    }

    pub fn directed() -> Self {
        Self {
            adjacency: FxHashMap::default(),
            directed: true,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Adds a vertex; returns false if it was already present.
    pub fn add(&mut self, vertex: V) -> bool {
        if self.adjacency.contains_key(&vertex) {
            return false;
        }
        self.adjacency.insert(vertex, FxHashMap::default());
        true
    }

    /// Removes a vertex and every edge touching it.
    pub fn remove(&mut self, vertex: &V) -> bool {
        if self.adjacency.remove(vertex).is_none() {
            return false;
        }
        for targets in self.adjacency.values_mut() {
            targets.remove(vertex);
        }
        true
    }

    /// Sets the weight of `source -> target` (both directions when
    /// undirected), adding missing vertices. Zero is a valid weight.
    /// Returns the previous weight, if any.
    pub fn set_edge(&mut self, source: V, target: V, weight: Weight) -> Option<Weight> {
        self.add(source.clone());
        self.add(target.clone());

        if !self.directed {
            if let Some(targets) = self.adjacency.get_mut(&target) {
                targets.insert(source.clone(), weight);
            }
        }

        self.adjacency
            .get_mut(&source)
            .and_then(|targets| targets.insert(target, weight))
    }

    pub fn remove_edge(&mut self, source: &V, target: &V) -> Option<Weight> {
        if !self.directed {
            if let Some(targets) = self.adjacency.get_mut(target) {
                targets.remove(source);
            }
        }
        self.adjacency
            .get_mut(source)
            .and_then(|targets| targets.remove(target))
    }

    pub fn weight(&self, source: &V, target: &V) -> Option<Weight> {
        self.adjacency
            .get(source)
            .and_then(|targets| targets.get(target).copied())
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.adjacency.contains_key(vertex)
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

impl<V: Clone + Eq + Hash + Debug> Default for AdjacencyGraph<V> {
    fn default() -> Self {
        Self::undirected()
    }
}

impl<V: Clone + Eq + Hash + Debug> Graph for AdjacencyGraph<V> {
    type Vertex = V;

    fn vertices(&self) -> FxHashSet<V> {
        self.adjacency.keys().cloned().collect()
    }

    fn neighbors(&self, vertex: &V) -> Vec<(V, Weight)> {
        match self.adjacency.get(vertex) {
            Some(targets) => targets
                .iter()
                .map(|(target, &weight)| (target.clone(), weight))
                .collect(),
            None => vec![],
        }
    }
}
