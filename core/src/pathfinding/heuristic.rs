//! Remaining-cost estimates for heuristic-guided search.
//!
//! Every estimate must be admissible (never above the true remaining cost)
//! for A* to return shortest paths. The search does not check this.

use crate::algorithm::Algorithm;
use crate::error::{SearchError, SearchResult};
use crate::graph::Weight;
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;

pub trait Heuristic<V> {
    fn estimate(&self, vertex: &V, target: &V) -> Weight;
}

impl<V, H: Heuristic<V> + ?Sized> Heuristic<V> for Box<H> {
    fn estimate(&self, vertex: &V, target: &V) -> Weight {
        (**self).estimate(vertex, target)
    }
}

impl<V, H: Heuristic<V> + ?Sized> Heuristic<V> for &H {
    fn estimate(&self, vertex: &V, target: &V) -> Weight {
        (**self).estimate(vertex, target)
    }
}

/// Always zero: A* with this heuristic expands exactly like Dijkstra.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroHeuristic;

impl<V> Heuristic<V> for ZeroHeuristic {
    fn estimate(&self, _vertex: &V, _target: &V) -> Weight {
        0
    }
}

/// Adapts a plain function or closure.
#[derive(Debug, Clone, Copy)]
pub struct FnHeuristic<F>(pub F);

impl<V, F: Fn(&V, &V) -> Weight> Heuristic<V> for FnHeuristic<F> {
    fn estimate(&self, vertex: &V, target: &V) -> Weight {
        (self.0)(vertex, target)
    }
}

/// Vertex ids that decode to integer grid coordinates.
pub trait GridCoordinate {
    fn coordinates(&self) -> Option<(i64, i64)>;
}

// "x,y" labels, whitespace around either part allowed.
impl GridCoordinate for str {
    fn coordinates(&self) -> Option<(i64, i64)> {
        let (x, y) = self.split_once(',')?;
        Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

impl GridCoordinate for String {
    fn coordinates(&self) -> Option<(i64, i64)> {
        self.as_str().coordinates()
    }
}

impl GridCoordinate for (i64, i64) {
    fn coordinates(&self) -> Option<(i64, i64)> {
        Some(*self)
    }
}

impl<T: GridCoordinate + ?Sized> GridCoordinate for &T {
    fn coordinates(&self) -> Option<(i64, i64)> {
        (**self).coordinates()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMetric {
    /// Octile distance, for grids with unit straight moves and √2 diagonals.
    Diagonal,
    /// Straight-line distance.
    Euclidean,
    /// Sum of axis offsets, for 4-connected grids.
    Manhattan,
}

impl GridMetric {
    /// Weighted distance between two points, rounded down.
    pub fn distance(&self, from: (i64, i64), to: (i64, i64), weighting: Weight) -> Weight {
        let dx = from.0.abs_diff(to.0);
        let dy = from.1.abs_diff(to.1);

        match self {
            GridMetric::Manhattan => weighting.saturating_mul(dx.saturating_add(dy)),
            GridMetric::Euclidean => {
                let straight = ((dx as f64).powi(2) + (dy as f64).powi(2)).sqrt();
                (weighting as f64 * straight).floor() as Weight
            }
            GridMetric::Diagonal => {
                let (long, short) = (dx.max(dy) as f64, dx.min(dy) as f64);
                (weighting as f64 * (long + (SQRT_2 - 1.0) * short)).floor() as Weight
            }
        }
    }
}

/// Cost of one straight step between adjacent grid positions. Always
/// positive; defaults to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Weighting(Weight);

impl Weighting {
    pub fn new(weighting: i64) -> SearchResult<Self> {
        if weighting <= 0 {
            return Err(SearchError::configuration(format!(
                "heuristic weighting must be positive, got {weighting}"
            )));
        }
        Ok(Self(weighting as Weight))
    }

    pub fn get(&self) -> Weight {
        self.0
    }

    /// Rejects non-positive values, keeping the current weighting.
    pub fn set(&mut self, weighting: i64) -> SearchResult<()> {
        *self = Self::new(weighting)?;
        Ok(())
    }
}

impl Default for Weighting {
    fn default() -> Self {
        Self(1)
    }
}

fn grid_estimate<V: GridCoordinate>(
    metric: GridMetric,
    weighting: Weighting,
    vertex: &V,
    target: &V,
) -> Weight {
    match (vertex.coordinates(), target.coordinates()) {
        (Some(from), Some(to)) => metric.distance(from, to, weighting.get()),
        _ => {
            tracing::debug!(?metric, "vertex id is not a grid coordinate, estimating 0");
            0
        }
    }
}

/// Grid-distance heuristic with an instance-scoped weighting, the cost of
/// one straight step between adjacent grid positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridHeuristic {
    metric: GridMetric,
    weighting: Weighting,
}

impl GridHeuristic {
    pub fn new(metric: GridMetric) -> Self {
        Self {
            metric,
            weighting: Weighting::default(),
        }
    }

    pub fn with_weighting(metric: GridMetric, weighting: i64) -> SearchResult<Self> {
        Ok(Self {
            metric,
            weighting: Weighting::new(weighting)?,
        })
    }

    pub fn metric(&self) -> GridMetric {
        self.metric
    }

    pub fn weighting(&self) -> Weight {
        self.weighting.get()
    }

    pub fn set_weighting(&mut self, weighting: i64) -> SearchResult<()> {
        self.weighting.set(weighting)
    }
}

impl<V: GridCoordinate> Heuristic<V> for GridHeuristic {
    fn estimate(&self, vertex: &V, target: &V) -> Weight {
        grid_estimate(self.metric, self.weighting, vertex, target)
    }
}

/// Heuristic chosen by an [`Algorithm`] selector; switchable at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmHeuristic {
    algorithm: Algorithm,
    weighting: Weighting,
}

impl AlgorithmHeuristic {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            weighting: Weighting::default(),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn weighting(&self) -> Weight {
        self.weighting.get()
    }

    pub fn set_weighting(&mut self, weighting: i64) -> SearchResult<()> {
        self.weighting.set(weighting)
    }
}

impl<V: GridCoordinate> Heuristic<V> for AlgorithmHeuristic {
    fn estimate(&self, vertex: &V, target: &V) -> Weight {
        match self.algorithm.grid_metric() {
            Some(metric) => grid_estimate(metric, self.weighting, vertex, target),
            None => 0,
        }
    }
}
