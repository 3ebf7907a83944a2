#![allow(dead_code)]

use pathstream_core::{AdjacencyGraph, Graph, SearchConfig, SearchEvent, Weight};
use rustc_hash::{FxHashMap, FxHashSet};
use std::{fmt::Debug, hash::Hash};

pub fn v(label: &str) -> String {
    label.to_string()
}

/// Config with a channel large enough that a search never blocks on it.
pub fn roomy_config() -> SearchConfig {
    SearchConfig::default().with_channel_capacity(4096)
}

/// v1 -1- v2 -3- v3, plus v1 -2- v3
pub fn triangle_graph() -> AdjacencyGraph<String> {
    let mut graph = AdjacencyGraph::undirected();
    graph.add(v("v1"));
    graph.add(v("v2"));
    graph.add(v("v3"));
    graph.set_edge(v("v1"), v("v2"), 1);
    graph.set_edge(v("v1"), v("v3"), 2);
    graph.set_edge(v("v2"), v("v3"), 3);
    graph
}

/// v1 -2- v2 -3- v3, and the cheaper detour v1 -1- v4 -1- v5 -1- v3
pub fn detour_graph() -> AdjacencyGraph<String> {
    let mut graph = AdjacencyGraph::undirected();
    graph.set_edge(v("v1"), v("v2"), 2);
    graph.set_edge(v("v2"), v("v3"), 3);
    graph.set_edge(v("v1"), v("v4"), 1);
    graph.set_edge(v("v4"), v("v5"), 1);
    graph.set_edge(v("v5"), v("v3"), 1);
    graph
}

/// 4-connected grid with "x,y" labels; `blocked` cells are left out.
pub fn grid_graph(width: i64, height: i64, weight: Weight, blocked: &[(i64, i64)]) -> AdjacencyGraph<String> {
    let mut graph = AdjacencyGraph::undirected();
    let is_open = |x: i64, y: i64| !blocked.contains(&(x, y));

    for x in 0..width {
        for y in 0..height {
            if !is_open(x, y) {
                continue;
            }
            graph.add(format!("{x},{y}"));
            if x + 1 < width && is_open(x + 1, y) {
                graph.set_edge(format!("{x},{y}"), format!("{},{y}", x + 1), weight);
            }
            if y + 1 < height && is_open(x, y + 1) {
                graph.set_edge(format!("{x},{y}"), format!("{x},{}", y + 1), weight);
            }
        }
    }

    graph
}

/// Minimum path weight to every reachable vertex by enumerating all simple
/// paths. Only usable on small graphs.
pub fn brute_force_distances<G: Graph>(graph: &G, source: &G::Vertex) -> FxHashMap<G::Vertex, Weight> {
    let mut best = FxHashMap::default();
    let mut on_path = FxHashSet::default();
    on_path.insert(source.clone());
    walk_simple_paths(graph, source, 0, &mut on_path, &mut best);
    best
}

fn walk_simple_paths<G: Graph>(
    graph: &G,
    current: &G::Vertex,
    distance: Weight,
    on_path: &mut FxHashSet<G::Vertex>,
    best: &mut FxHashMap<G::Vertex, Weight>,
) {
    let improved = best.get(current).is_none_or(|&known| distance < known);
    if improved {
        best.insert(current.clone(), distance);
    }

    for (neighbor, weight) in graph.neighbors(current) {
        if on_path.insert(neighbor.clone()) {
            walk_simple_paths(graph, &neighbor, distance + weight, on_path, best);
            on_path.remove(&neighbor);
        }
    }
}

/// Sum of edge weights along `path`, panicking on a missing edge.
pub fn path_weight<V: Clone + Eq + Hash + Debug>(graph: &AdjacencyGraph<V>, path: &[V]) -> Weight {
    path.windows(2)
        .map(|step| {
            graph
                .weight(&step[0], &step[1])
                .unwrap_or_else(|| panic!("no edge {:?} -> {:?}", step[0], step[1]))
        })
        .sum()
}

/// Checks START, UPDATE 0..n, END framing for one run.
pub fn assert_single_run_protocol<V: Eq + Hash + Debug>(events: &[SearchEvent<V>]) {
    assert!(events.len() >= 2, "expected at least START and END, got {events:?}");
    assert!(events[0].is_start(), "first event must be START");
    assert!(events[events.len() - 1].is_end(), "last event must be END");

    let updates = &events[1..events.len() - 1];
    for (expected_sequence, event) in updates.iter().enumerate() {
        assert_eq!(event.sequence(), Some(expected_sequence as u64));
    }
}

pub fn end_of<V: Eq + Hash + Clone>(events: &[SearchEvent<V>]) -> (bool, Vec<V>) {
    match events.last() {
        Some(SearchEvent::End { found, path }) => (*found, path.clone()),
        other => panic!("run did not end with END: {:?}", other.map(|event| event.kind())),
    }
}
