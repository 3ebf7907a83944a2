mod expansion;
pub mod frontier;
pub mod heuristic;
pub mod search;
pub mod state;
pub mod utils;

// Re-export the public surface
pub use expansion::{SearchPhase, SearchStats};
pub use frontier::{Frontier, FrontierEntry, FrontierKey};
pub use heuristic::{
    AlgorithmHeuristic, FnHeuristic, GridCoordinate, GridHeuristic, GridMetric, Heuristic,
    Weighting, ZeroHeuristic,
};
pub use search::StreamingSearch;
pub use state::{Distance, SearchState, UNREACHABLE};
pub use utils::{furthest_reached, path_to, reconstruct_path};
