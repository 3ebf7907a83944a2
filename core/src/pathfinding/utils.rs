use super::state::{Distance, SearchState};
use crate::error::{SearchError, SearchResult};
use rustc_hash::FxHashMap;
use std::{fmt::Debug, hash::Hash};

/// Walks predecessors back from `endpoint` and returns the path
/// source-to-endpoint inclusive.
pub fn reconstruct_path<V: Clone + Eq + Hash + Debug>(
    predecessors: &FxHashMap<V, V>,
    source: &V,
    endpoint: &V,
) -> SearchResult<Vec<V>> {
    let mut path = vec![endpoint.clone()];
    let mut current_vertex = endpoint;

    while current_vertex != source {
        // A valid chain never has more steps than recorded predecessors.
        let parent_vertex = match predecessors.get(current_vertex) {
            Some(parent) if path.len() <= predecessors.len() => parent,
            _ => return Err(broken_chain(current_vertex, &path)),
        };
        path.push(parent_vertex.clone());
        current_vertex = parent_vertex;
    }

    path.reverse();
    Ok(path)
}

fn broken_chain<V: Debug>(vertex: &V, partial: &[V]) -> SearchError {
    let error = SearchError::NoPredecessor {
        vertex: format!("{vertex:?}"),
        partial: partial.iter().map(|step| format!("{step:?}")).collect(),
    };
    tracing::error!(%error, "path reconstruction aborted");
    error
}

/// Path from `source` to `endpoint`, which must have a finite distance.
pub fn path_to<V: Clone + Eq + Hash + Debug>(
    distances: &FxHashMap<V, Distance>,
    predecessors: &FxHashMap<V, V>,
    source: &V,
    endpoint: &V,
) -> SearchResult<Vec<V>> {
    let reached = distances
        .get(endpoint)
        .is_some_and(|distance| distance.is_finite());
    if !reached {
        return Err(SearchError::Unreached {
            vertex: format!("{endpoint:?}"),
        });
    }
    reconstruct_path(predecessors, source, endpoint)
}

/// Reached vertex with the largest finite distance; ties go to the vertex
/// reached first. Falls back to the source when nothing else was reached.
pub fn furthest_reached<V: Clone + Eq + Hash>(state: &SearchState<V>) -> &V {
    let mut furthest = state.source();
    let mut furthest_distance = 0;

    for vertex in state.reach_order() {
        if let Some(distance) = state.distance(vertex).finite() {
            if distance > furthest_distance {
                furthest = vertex;
                furthest_distance = distance;
            }
        }
    }

    furthest
}
