//! The relax/pop loop shared by Dijkstra and A*.
//!
//! Priority is `distance + estimate(vertex, target)` when a target is set and
//! plain `distance` in whole-graph mode, so a zero estimate reduces A* to
//! Dijkstra. Every successful relaxation is streamed as an UPDATE event.

use super::frontier::{Frontier, FrontierEntry};
use super::heuristic::Heuristic;
use super::state::{Distance, SearchState};
use super::utils::{furthest_reached, path_to};
use crate::error::{SearchError, SearchResult};
use crate::events::{CancelToken, SearchEvent, channel::EventProducer};
use crate::graph::{Graph, Weight};
use crate::search_config::UpdateMode;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{hash::Hash, time::Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    #[default]
    Ready,
    Running,
    /// The target was popped from the frontier.
    Found,
    /// The frontier emptied without popping a target.
    Exhausted,
    /// Cancelled, or the event channel rejected a push.
    Interrupted,
}

impl SearchPhase {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            SearchPhase::Found | SearchPhase::Exhausted | SearchPhase::Interrupted
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub vertices_settled: usize,
    pub relaxations: usize,
    pub events_emitted: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone)]
pub(crate) enum SearchMode<V> {
    ToTarget(V),
    WholeGraph,
}

/// Result of one run, handed back to the search object.
#[derive(Debug, Clone)]
pub(crate) struct ExpansionOutcome<V> {
    pub phase: SearchPhase,
    pub path: Vec<V>,
    pub distances: FxHashMap<V, Distance>,
    pub predecessors: FxHashMap<V, V>,
    pub stats: SearchStats,
    pub interruption: Option<SearchError>,
}

impl<V> ExpansionOutcome<V> {
    /// Outcome before any run: phase `Ready`, nothing reached.
    pub fn empty() -> Self {
        Self {
            phase: SearchPhase::Ready,
            path: Vec::new(),
            distances: FxHashMap::default(),
            predecessors: FxHashMap::default(),
            stats: SearchStats::default(),
            interruption: None,
        }
    }
}

/// Pushes events for one run and numbers the UPDATEs. After the first
/// failed push it refuses every further emission.
struct EventEmitter<'a, V: Eq + Hash> {
    channel: &'a EventProducer<V>,
    cancel: &'a CancelToken,
    sequence: u64,
    emitted: usize,
    interruption: Option<SearchError>,
}

impl<'a, V: Eq + Hash> EventEmitter<'a, V> {
    fn new(channel: &'a EventProducer<V>, cancel: &'a CancelToken) -> Self {
        Self {
            channel,
            cancel,
            sequence: 0,
            emitted: 0,
            interruption: None,
        }
    }

    fn emit(&mut self, event: SearchEvent<V>) -> bool {
        if self.interruption.is_some() {
            return false;
        }
        let kind = event.kind();
        match self.channel.push(event, self.cancel) {
            Ok(()) => {
                self.emitted += 1;
                true
            }
            Err(error) => {
                tracing::warn!(%error, kind, "event push failed, stopping search");
                self.interruption = Some(error);
                false
            }
        }
    }

    fn start(&mut self) -> bool {
        self.sequence = 0;
        self.emit(SearchEvent::Start)
    }

    fn update(&mut self, distances: FxHashMap<V, Weight>) -> bool {
        let sequence = self.sequence;
        self.sequence += 1;
        self.emit(SearchEvent::Update {
            sequence,
            distances,
        })
    }

    fn end(&mut self, found: bool, path: Vec<V>) -> bool {
        self.emit(SearchEvent::End { found, path })
    }
}

pub(crate) struct Expansion<'a, G: Graph, H> {
    graph: &'a G,
    heuristic: &'a H,
    mode: SearchMode<G::Vertex>,
    update_mode: UpdateMode,
    frontier: Frontier<G::Vertex>,
    state: SearchState<G::Vertex>,
    emitter: EventEmitter<'a, G::Vertex>,
    cancel: &'a CancelToken,
    phase: SearchPhase,
    relaxations: usize,
}

impl<'a, G, H> Expansion<'a, G, H>
where
    G: Graph,
    H: Heuristic<G::Vertex>,
{
    pub fn new(
        graph: &'a G,
        heuristic: &'a H,
        source: G::Vertex,
        mode: SearchMode<G::Vertex>,
        update_mode: UpdateMode,
        channel: &'a EventProducer<G::Vertex>,
        cancel: &'a CancelToken,
    ) -> Self {
        let vertices = graph.vertices();
        if !vertices.contains(&source) {
            tracing::warn!(?source, "source is not a graph vertex");
        }
        if let SearchMode::ToTarget(target) = &mode {
            if !vertices.contains(target) {
                tracing::warn!(?target, "target is not a graph vertex");
            }
        }

        Self {
            graph,
            heuristic,
            mode,
            update_mode,
            frontier: Frontier::new(),
            state: SearchState::new(source, vertices),
            emitter: EventEmitter::new(channel, cancel),
            cancel,
            phase: SearchPhase::Ready,
            relaxations: 0,
        }
    }

    pub fn run(mut self) -> SearchResult<ExpansionOutcome<G::Vertex>> {
        let search_timer = Instant::now();
        self.phase = SearchPhase::Running;

        let source = self.state.source().clone();
        let source_priority = self.priority(&source, 0);
        let source_key = self.frontier.insert(source.clone(), source_priority);
        self.state.set_frontier_key(source.clone(), source_key);

        tracing::debug!(?source, mode = ?self.mode, "search started");

        let initial_snapshot = self.state.finite_distances();
        if self.emitter.start() && self.emitter.update(initial_snapshot) {
            self.expand()?;
        } else {
            self.phase = SearchPhase::Interrupted;
        }

        self.finish(search_timer)
    }

    fn expand(&mut self) -> SearchResult<()> {
        while !self.frontier.is_empty() {
            if self.cancel.is_cancelled() {
                tracing::warn!("search cancelled");
                self.emitter.interruption = Some(SearchError::Cancelled);
                self.phase = SearchPhase::Interrupted;
                return Ok(());
            }

            let FrontierEntry {
                vertex: current_vertex,
                priority,
            } = self.frontier.extract_min()?;
            self.state.settle(&current_vertex);
            tracing::trace!(vertex = ?current_vertex, priority, "popped");

            if self.is_target(&current_vertex) {
                self.phase = SearchPhase::Found;
                return Ok(());
            }

            // Only reached vertices are ever inserted into the frontier.
            let Some(current_distance) = self.state.distance(&current_vertex).finite() else {
                continue;
            };

            for (neighbor, weight) in self.graph.neighbors(&current_vertex) {
                if !self.visit_neighbor(neighbor, &current_vertex, weight, current_distance) {
                    self.phase = SearchPhase::Interrupted;
                    return Ok(());
                }
            }
        }

        self.phase = SearchPhase::Exhausted;
        Ok(())
    }

    /// Relaxes one edge. Returns false if the resulting UPDATE could not be
    /// delivered.
    fn visit_neighbor(
        &mut self,
        neighbor: G::Vertex,
        current: &G::Vertex,
        weight: Weight,
        current_distance: Weight,
    ) -> bool {
        let new_distance = current_distance.saturating_add(weight);
        if !self
            .state
            .relax(neighbor.clone(), current.clone(), new_distance)
        {
            return true;
        }
        self.relaxations += 1;

        let new_priority = self.priority(&neighbor, new_distance);
        let key = match self.state.frontier_key(&neighbor) {
            Some(old_key) => self
                .frontier
                .decrease_key(neighbor.clone(), old_key, new_priority),
            None => self.frontier.insert(neighbor.clone(), new_priority),
        };
        self.state.set_frontier_key(neighbor.clone(), key);

        tracing::trace!(vertex = ?neighbor, distance = new_distance, "relaxed");

        let distances = match self.update_mode {
            UpdateMode::Delta => {
                let mut delta = FxHashMap::default();
                delta.insert(neighbor, new_distance);
                delta
            }
            UpdateMode::Snapshot => self.state.finite_distances(),
        };
        self.emitter.update(distances)
    }

    fn priority(&self, vertex: &G::Vertex, distance: Weight) -> Weight {
        match &self.mode {
            SearchMode::ToTarget(target) => {
                distance.saturating_add(self.heuristic.estimate(vertex, target))
            }
            SearchMode::WholeGraph => distance,
        }
    }

    fn is_target(&self, vertex: &G::Vertex) -> bool {
        matches!(&self.mode, SearchMode::ToTarget(target) if target == vertex)
    }

    fn finish(mut self, search_timer: Instant) -> SearchResult<ExpansionOutcome<G::Vertex>> {
        let found = self.phase == SearchPhase::Found;
        let endpoint = match &self.mode {
            SearchMode::ToTarget(target) if found => target.clone(),
            _ => furthest_reached(&self.state).clone(),
        };

        let path = path_to(
            self.state.distances(),
            self.state.predecessors(),
            self.state.source(),
            &endpoint,
        )?;

        if self.phase != SearchPhase::Interrupted && !self.emitter.end(found, path.clone()) {
            tracing::warn!("END event was not delivered");
        }

        let stats = SearchStats {
            vertices_settled: self.state.settled_count(),
            relaxations: self.relaxations,
            events_emitted: self.emitter.emitted,
            duration_ms: search_timer.elapsed().as_millis() as u64,
        };

        tracing::debug!(
            phase = ?self.phase,
            ?endpoint,
            settled = stats.vertices_settled,
            events = stats.events_emitted,
            "search finished"
        );

        let (distances, predecessors) = self.state.into_parts();
        Ok(ExpansionOutcome {
            phase: self.phase,
            path,
            distances,
            predecessors,
            stats,
            interruption: self.emitter.interruption,
        })
    }
}
