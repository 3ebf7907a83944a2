mod common;

use common::{detour_graph, grid_graph, path_weight, roomy_config, v};
use pathstream_core::pathfinding::{FnHeuristic, GridCoordinate, Weighting};
use pathstream_core::{
    Algorithm, AlgorithmHeuristic, Distance, GridHeuristic, GridMetric, Heuristic, SearchError,
    StreamingSearch, ZeroHeuristic,
};

/// 6x6 grid with a wall at x = 2 leaving only the bottom row open.
fn walled_grid() -> pathstream_core::AdjacencyGraph<String> {
    let wall: Vec<(i64, i64)> = (0..5).map(|y| (2, y)).collect();
    grid_graph(6, 6, 1, &wall)
}

fn assert_adjacent_steps(path: &[String]) {
    for step in path.windows(2) {
        let (x1, y1) = step[0].coordinates().unwrap();
        let (x2, y2) = step[1].coordinates().unwrap();
        assert_eq!(x1.abs_diff(x2) + y1.abs_diff(y2), 1, "{step:?} is not one grid step");
    }
}

#[test]
fn test_manhattan_finds_shortest_grid_path() {
    let graph = grid_graph(5, 5, 1, &[]);
    let mut search = StreamingSearch::for_algorithm(&graph, Algorithm::AStarManhattan, roomy_config());

    assert!(search.search_for_target(&v("0,0"), &v("4,4")).unwrap());

    let path = search.path();
    assert_eq!(path.len(), 9);
    assert_eq!(path.first(), Some(&v("0,0")));
    assert_eq!(path.last(), Some(&v("4,4")));
    assert_adjacent_steps(path);
    assert_eq!(search.distance(&v("4,4")), Distance::Finite(8));
}

#[test]
fn test_every_algorithm_matches_dijkstra_around_a_wall() {
    let graph = walled_grid();
    let source = v("0,0");
    let target = v("5,0");

    let mut dijkstra = StreamingSearch::dijkstra(&graph, roomy_config());
    let expected = dijkstra.find_distance_to_target(&source, &target).unwrap();
    assert_eq!(expected, Some(15));

    for algorithm in Algorithm::ALL {
        let mut search = StreamingSearch::for_algorithm(&graph, algorithm, roomy_config());
        let path = search
            .find_path_to_target(&source, &target)
            .unwrap()
            .unwrap_or_else(|| panic!("{algorithm} found no path"));

        assert_eq!(Some(path_weight(&graph, &path)), expected, "{algorithm}");
        assert_adjacent_steps(&path);
    }
}

#[test]
fn test_heuristic_settles_fewer_vertices_than_dijkstra() {
    let graph = grid_graph(10, 10, 1, &[]);
    let source = v("0,0");
    let target = v("3,3");

    let mut dijkstra = StreamingSearch::dijkstra(&graph, roomy_config());
    assert!(dijkstra.search_for_target(&source, &target).unwrap());

    let mut astar = StreamingSearch::a_star(
        &graph,
        GridHeuristic::new(GridMetric::Manhattan),
        roomy_config(),
    );
    assert!(astar.search_for_target(&source, &target).unwrap());

    assert_eq!(astar.distance(&target), dijkstra.distance(&target));
    assert!(astar.stats().vertices_settled < dijkstra.stats().vertices_settled);
}

#[test]
fn test_zero_heuristic_matches_dijkstra() {
    let graph = detour_graph();

    let mut dijkstra = StreamingSearch::dijkstra(&graph, roomy_config());
    let mut zero = StreamingSearch::a_star(&graph, ZeroHeuristic, roomy_config());

    for target in ["v2", "v3", "v4", "v5"] {
        assert_eq!(
            zero.find_distance_to_target(&v("v1"), &v(target)).unwrap(),
            dijkstra.find_distance_to_target(&v("v1"), &v(target)).unwrap()
        );
        assert_eq!(zero.path(), dijkstra.path());
    }
}

#[test]
fn test_weighted_grid_with_matching_weighting() {
    let graph = grid_graph(6, 6, 10, &[(1, 1), (2, 2), (3, 3)]);
    let heuristic = GridHeuristic::with_weighting(GridMetric::Euclidean, 10).unwrap();

    let mut dijkstra = StreamingSearch::dijkstra(&graph, roomy_config());
    let mut astar = StreamingSearch::a_star(&graph, heuristic, roomy_config());

    assert_eq!(
        astar.find_distance_to_target(&v("0,0"), &v("5,5")).unwrap(),
        dijkstra.find_distance_to_target(&v("0,0"), &v("5,5")).unwrap()
    );
}

#[test]
fn test_grid_metric_formulas() {
    let (from, to) = ((0, 0), (3, 4));

    assert_eq!(GridMetric::Manhattan.distance(from, to, 1), 7);
    assert_eq!(GridMetric::Euclidean.distance(from, to, 1), 5);
    assert_eq!(GridMetric::Diagonal.distance(from, to, 1), 5); // 4 + 3(√2 - 1), rounded down

    assert_eq!(GridMetric::Manhattan.distance(from, to, 2), 14);
    assert_eq!(GridMetric::Euclidean.distance(from, to, 2), 10);
    assert_eq!(GridMetric::Diagonal.distance(from, to, 2), 10);

    // Symmetric in its endpoints
    assert_eq!(GridMetric::Manhattan.distance(to, from, 1), 7);
    assert_eq!(GridMetric::Euclidean.distance((-3, 0), (0, -4), 1), 5);
}

#[test]
fn test_grid_heuristic_decodes_labels() {
    let heuristic = GridHeuristic::new(GridMetric::Manhattan);

    assert_eq!(heuristic.estimate(&v("0,0"), &v("3,4")), 7);
    assert_eq!(heuristic.estimate(&v(" 1 , 2 "), &v("1,5")), 3);
    assert_eq!(heuristic.estimate(&(0_i64, 0_i64), &(-2_i64, 2_i64)), 4);

    // Labels without coordinates estimate zero
    assert_eq!(heuristic.estimate(&v("alpha"), &v("3,4")), 0);
    assert_eq!(heuristic.estimate(&v("1,x"), &v("3,4")), 0);
}

#[test]
fn test_weighting_must_be_positive() {
    let mut heuristic = GridHeuristic::new(GridMetric::Diagonal);
    assert_eq!(heuristic.weighting(), 1);

    assert!(matches!(
        heuristic.set_weighting(0),
        Err(SearchError::Configuration(_))
    ));
    assert!(matches!(
        heuristic.set_weighting(-5),
        Err(SearchError::Configuration(_))
    ));
    assert_eq!(heuristic.weighting(), 1);

    heuristic.set_weighting(3).unwrap();
    assert_eq!(heuristic.weighting(), 3);

    assert!(GridHeuristic::with_weighting(GridMetric::Manhattan, 0).is_err());
}

#[test]
fn test_both_grid_heuristics_share_weighting_rules() {
    assert_eq!(Weighting::default().get(), 1);
    assert!(matches!(Weighting::new(0), Err(SearchError::Configuration(_))));

    let mut weighting = Weighting::new(4).unwrap();
    assert!(weighting.set(-2).is_err());
    assert_eq!(weighting.get(), 4);

    let mut grid = GridHeuristic::new(GridMetric::Manhattan);
    let mut selected = AlgorithmHeuristic::new(Algorithm::AStarManhattan);
    for value in [0, -1, 3] {
        assert_eq!(
            grid.set_weighting(value).is_ok(),
            selected.set_weighting(value).is_ok(),
            "weighting {value}"
        );
    }
    assert_eq!(grid.weighting(), 3);
    assert_eq!(selected.weighting(), 3);
    assert_eq!(
        grid.estimate(&v("0,0"), &v("2,2")),
        selected.estimate(&v("0,0"), &v("2,2"))
    );
}

#[test]
fn test_algorithm_heuristic_weighting_through_search() {
    let graph = grid_graph(3, 3, 1, &[]);
    let mut search = StreamingSearch::for_algorithm(&graph, Algorithm::AStarManhattan, roomy_config());

    assert!(search.heuristic_mut().set_weighting(-1).is_err());
    assert_eq!(search.heuristic().weighting(), 1);

    search.heuristic_mut().set_weighting(2).unwrap();
    assert_eq!(search.heuristic().weighting(), 2);
}

#[test]
fn test_dijkstra_selector_estimates_zero() {
    let heuristic = AlgorithmHeuristic::new(Algorithm::Dijkstra);
    assert_eq!(heuristic.estimate(&v("0,0"), &v("9,9")), 0);

    let manhattan = AlgorithmHeuristic::new(Algorithm::AStarManhattan);
    assert_eq!(manhattan.estimate(&v("0,0"), &v("9,9")), 18);
}

#[test]
fn test_select_algorithm_switches_strategy() {
    let graph = walled_grid();
    let mut search = StreamingSearch::for_algorithm(&graph, Algorithm::Dijkstra, roomy_config());

    search.select_algorithm("euclidean").unwrap();
    assert_eq!(search.algorithm(), Algorithm::AStarEuclidean);

    // Unknown names keep the current strategy
    assert!(matches!(
        search.select_algorithm("bidirectional"),
        Err(SearchError::Configuration(_))
    ));
    assert_eq!(search.algorithm(), Algorithm::AStarEuclidean);

    assert_eq!(
        search.find_distance_to_target(&v("0,0"), &v("5,0")).unwrap(),
        Some(15)
    );
}

#[test]
fn test_closure_and_boxed_heuristics() {
    let graph = grid_graph(4, 4, 1, &[]);

    let closure = FnHeuristic(|vertex: &String, target: &String| {
        match (vertex.coordinates(), target.coordinates()) {
            (Some(from), Some(to)) => GridMetric::Manhattan.distance(from, to, 1),
            _ => 0,
        }
    });
    let mut with_closure = StreamingSearch::a_star(&graph, closure, roomy_config());
    assert_eq!(
        with_closure.find_distance_to_target(&v("0,0"), &v("3,3")).unwrap(),
        Some(6)
    );

    let boxed: Box<dyn Heuristic<String>> = Box::new(GridHeuristic::new(GridMetric::Diagonal));
    let mut with_box = StreamingSearch::a_star(&graph, boxed, roomy_config());
    assert_eq!(
        with_box.find_distance_to_target(&v("3,0"), &v("0,3")).unwrap(),
        Some(6)
    );
}

#[test]
fn test_inconsistent_heuristic_reopens_settled_vertex() {
    // Admissible (h(a) = 6 is a's true remaining cost) but not consistent
    // across a -> b, so b is settled at 4 before the cheaper route via a.
    let mut graph = pathstream_core::AdjacencyGraph::directed();
    graph.set_edge(v("s"), v("a"), 1);
    graph.set_edge(v("s"), v("b"), 4);
    graph.set_edge(v("a"), v("b"), 1);
    graph.set_edge(v("b"), v("t"), 5);

    let heuristic = FnHeuristic(|vertex: &String, _target: &String| {
        if vertex == "a" { 6 } else { 0 }
    });
    let mut search = StreamingSearch::a_star(&graph, heuristic, roomy_config());
    let sink = search.event_sink();

    assert!(search.search_for_target(&v("s"), &v("t")).unwrap());
    assert_eq!(search.path(), &[v("s"), v("a"), v("b"), v("t")]);
    assert_eq!(search.distance(&v("t")), Distance::Finite(7));
    assert_eq!(search.distance(&v("b")), Distance::Finite(2));

    // a, b, t, then b and t again once the shorter route through a is known
    assert_eq!(search.stats().relaxations, 5);
    let b_updates: Vec<u64> = sink
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            pathstream_core::SearchEvent::Update { distances, .. } => distances.get("b").copied(),
            _ => None,
        })
        .collect();
    assert_eq!(b_updates, vec![4, 2]);
}
