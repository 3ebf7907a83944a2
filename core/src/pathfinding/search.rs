use super::expansion::{Expansion, ExpansionOutcome, SearchMode, SearchPhase, SearchStats};
use super::heuristic::{AlgorithmHeuristic, GridCoordinate, Heuristic, ZeroHeuristic};
use super::state::Distance;
use super::utils::path_to;
use crate::algorithm::Algorithm;
use crate::error::{SearchError, SearchResult};
use crate::events::{CancelToken, EventChannel, channel::EventProducer};
use crate::graph::{Graph, Weight};
use crate::search_config::SearchConfig;
use rustc_hash::FxHashMap;

/// Shortest-path search that streams its progress into an [`EventChannel`].
///
/// Each call to [`search_for_target`](Self::search_for_target) or
/// [`search_whole_graph`](Self::search_whole_graph) runs to completion on the
/// calling thread with fresh frontier and state; afterwards `path`,
/// `distances` and `predecessors` describe that run. One instance serves one
/// search at a time; use separate instances for concurrent searches.
pub struct StreamingSearch<G: Graph, H = ZeroHeuristic> {
    graph: G,
    heuristic: H,
    config: SearchConfig,
    event_sink: Option<EventProducer<G::Vertex>>,
    cancel_token: CancelToken,
    last_source: Option<G::Vertex>,
    last_run: ExpansionOutcome<G::Vertex>,
}

impl<G: Graph> StreamingSearch<G, ZeroHeuristic> {
    /// Uniform-cost search.
    pub fn dijkstra(graph: G, config: SearchConfig) -> Self {
        Self::a_star(graph, ZeroHeuristic, config)
    }
}

impl<G> StreamingSearch<G, AlgorithmHeuristic>
where
    G: Graph,
    G::Vertex: GridCoordinate,
{
    /// Search whose heuristic follows an [`Algorithm`] selector.
    pub fn for_algorithm(graph: G, algorithm: Algorithm, config: SearchConfig) -> Self {
        Self::a_star(graph, AlgorithmHeuristic::new(algorithm), config)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.heuristic.algorithm()
    }

    /// Switches strategy by name. Unknown names are rejected and the current
    /// strategy is kept.
    pub fn select_algorithm(&mut self, selector: &str) -> SearchResult<()> {
        let algorithm: Algorithm = selector.parse()?;
        self.heuristic.set_algorithm(algorithm);
        Ok(())
    }
}

impl<G, H> StreamingSearch<G, H>
where
    G: Graph,
    H: Heuristic<G::Vertex>,
{
    /// Heuristic-guided search. The heuristic must be admissible for the
    /// returned paths to be shortest.
    pub fn a_star(graph: G, heuristic: H, config: SearchConfig) -> Self {
        Self {
            graph,
            heuristic,
            config: config.validated(),
            event_sink: None,
            cancel_token: CancelToken::new(),
            last_source: None,
            last_run: ExpansionOutcome::empty(),
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    pub fn heuristic_mut(&mut self) -> &mut H {
        &mut self.heuristic
    }

    /// Installs the channel future runs report into. Returns true if no
    /// channel was set before, false if an existing one was replaced.
    ///
    /// The search keeps only a producer handle: once every consumer handle
    /// of `channel` is dropped, the next push ends the run as if the channel
    /// had been closed.
    pub fn set_event_sink(&mut self, channel: EventChannel<G::Vertex>) -> bool {
        self.event_sink.replace(channel.producer()).is_none()
    }

    /// New consumer handle on the event channel, which is created with the
    /// configured capacity on first use.
    pub fn event_sink(&mut self) -> EventChannel<G::Vertex> {
        self.ensure_event_sink().subscribe()
    }

    pub fn set_cancel_token(&mut self, cancel_token: CancelToken) {
        self.cancel_token = cancel_token;
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel_token.clone()
    }

    /// Searches from `source` until `target` is popped or the frontier
    /// empties. Returns whether the target was found.
    ///
    /// When it was not, [`path`](Self::path) leads to the furthest vertex
    /// reached instead. An interrupted event stream ends the run early but
    /// still returns `Ok` with whatever was computed.
    pub fn search_for_target(&mut self, source: &G::Vertex, target: &G::Vertex) -> SearchResult<bool> {
        self.run(source, SearchMode::ToTarget(target.clone()))?;
        Ok(self.phase() == SearchPhase::Found)
    }

    /// Computes distances from `source` to every vertex. Unreachable
    /// vertices map to [`UNREACHABLE`](super::state::UNREACHABLE).
    pub fn search_whole_graph(&mut self, source: &G::Vertex) -> SearchResult<FxHashMap<G::Vertex, i64>> {
        self.run(source, SearchMode::WholeGraph)?;
        Ok(self
            .distances()
            .iter()
            .map(|(vertex, distance)| (vertex.clone(), distance.reported()))
            .collect())
    }

    /// Shortest path to `target`, or `None` if it cannot be reached.
    pub fn find_path_to_target(
        &mut self,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> SearchResult<Option<Vec<G::Vertex>>> {
        let found = self.search_for_target(source, target)?;
        Ok(found.then(|| self.path().to_vec()))
    }

    /// Shortest distance to `target`, or `None` if it cannot be reached.
    pub fn find_distance_to_target(
        &mut self,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> SearchResult<Option<Weight>> {
        let found = self.search_for_target(source, target)?;
        Ok(found.then(|| self.distance(target).finite()).flatten())
    }

    /// Path of the last run: to the target when found, otherwise to the
    /// furthest vertex reached. Empty before the first run.
    pub fn path(&self) -> &[G::Vertex] {
        &self.last_run.path
    }

    /// Distances of the last run; vertices never reached are `Infinite`.
    pub fn distances(&self) -> &FxHashMap<G::Vertex, Distance> {
        &self.last_run.distances
    }

    pub fn predecessors(&self) -> &FxHashMap<G::Vertex, G::Vertex> {
        &self.last_run.predecessors
    }

    pub fn distance(&self, vertex: &G::Vertex) -> Distance {
        self.distances()
            .get(vertex)
            .copied()
            .unwrap_or(Distance::Infinite)
    }

    /// Path from the last run's source to any vertex it reached.
    pub fn path_to(&self, vertex: &G::Vertex) -> SearchResult<Vec<G::Vertex>> {
        match &self.last_source {
            Some(source) => path_to(self.distances(), self.predecessors(), source, vertex),
            None => Err(SearchError::Unreached {
                vertex: format!("{vertex:?}"),
            }),
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.last_run.phase
    }

    pub fn stats(&self) -> &SearchStats {
        &self.last_run.stats
    }

    /// Why the last run stopped early, if it did.
    pub fn interruption(&self) -> Option<&SearchError> {
        self.last_run.interruption.as_ref()
    }

    fn ensure_event_sink(&mut self) -> &EventProducer<G::Vertex> {
        let config = &self.config;
        self.event_sink.get_or_insert_with(|| {
            EventProducer::unattached(config.channel_capacity, config.cancel_poll_interval())
        })
    }

    fn run(&mut self, source: &G::Vertex, mode: SearchMode<G::Vertex>) -> SearchResult<()> {
        let channel = self.ensure_event_sink().clone();
        self.last_source = Some(source.clone());
        self.last_run = ExpansionOutcome::empty();

        let expansion = Expansion::new(
            &self.graph,
            &self.heuristic,
            source.clone(),
            mode,
            self.config.update_mode,
            &channel,
            &self.cancel_token,
        );
        self.last_run = expansion.run()?;
        Ok(())
    }
}
