pub mod algorithm;
pub mod error;
pub mod events;
pub mod graph;
pub mod pathfinding;
pub mod search_config;

// Re-export commonly used items
pub use algorithm::Algorithm;
pub use error::{SearchError, SearchResult};
pub use events::{CancelToken, EventChannel, SearchEvent};
pub use graph::{AdjacencyGraph, Graph, Weight};
pub use pathfinding::{
    AlgorithmHeuristic, Distance, GridHeuristic, GridMetric, Heuristic, SearchPhase, SearchStats,
    StreamingSearch, UNREACHABLE, ZeroHeuristic,
};
pub use search_config::{SearchConfig, UpdateMode};
