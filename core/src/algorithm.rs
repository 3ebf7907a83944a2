use crate::error::SearchError;
use crate::pathfinding::heuristic::GridMetric;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Search strategy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    #[serde(rename = "dijkstra")]
    Dijkstra,
    #[serde(rename = "astar-diagonal")]
    AStarDiagonal,
    #[serde(rename = "astar-euclidean")]
    AStarEuclidean,
    #[serde(rename = "astar-manhattan")]
    AStarManhattan,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Dijkstra,
        Algorithm::AStarDiagonal,
        Algorithm::AStarEuclidean,
        Algorithm::AStarManhattan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStarDiagonal => "astar-diagonal",
            Algorithm::AStarEuclidean => "astar-euclidean",
            Algorithm::AStarManhattan => "astar-manhattan",
        }
    }

    /// Grid metric driving the heuristic, `None` for plain Dijkstra.
    pub fn grid_metric(&self) -> Option<GridMetric> {
        match self {
            Algorithm::Dijkstra => None,
            Algorithm::AStarDiagonal => Some(GridMetric::Diagonal),
            Algorithm::AStarEuclidean => Some(GridMetric::Euclidean),
            Algorithm::AStarManhattan => Some(GridMetric::Manhattan),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SearchError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        match selector.trim().to_lowercase().as_str() {
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "astar-diagonal" | "diagonal" => Ok(Algorithm::AStarDiagonal),
            "astar-euclidean" | "euclidean" => Ok(Algorithm::AStarEuclidean),
            "astar-manhattan" | "manhattan" => Ok(Algorithm::AStarManhattan),
            _ => Err(SearchError::configuration(format!(
                "unknown algorithm selector {selector:?}"
            ))),
        }
    }
}

// Lenient conversion: unknown selectors fall back to Dijkstra.
impl From<&str> for Algorithm {
    fn from(selector: &str) -> Self {
        selector.parse().unwrap_or_default()
    }
}

impl From<String> for Algorithm {
    fn from(selector: String) -> Self {
        Algorithm::from(selector.as_str())
    }
}
