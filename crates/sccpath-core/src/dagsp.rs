//! Single-source shortest and longest paths on a DAG.
//!
//! # Algorithm
//!
//! Vertices are relaxed strictly in topological order, so every vertex's
//! distance is final before any of its outgoing edges are used:
//!
//! 1. Every distance starts [`Distance::Unreachable`] except the source,
//!    which is `0` with no parent.
//! 2. For each vertex in order that is reachable, every outgoing edge is
//!    relaxed. Shortest mode uses the edge's minimum weight, longest mode its
//!    maximum; simple edges use their single weight in both modes.
//! 3. A neighbor is updated only on *strict* improvement. Ties keep the
//!    parent that reached the vertex first.
//!
//! Distances are `i64` sums of `i32` weights. Overflow is reported as
//! [`GraphError::DistanceOverflow`] instead of wrapping.

#![allow(clippy::module_name_repetitions)]

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, instrument};

use crate::error::{GraphError, VertexRole};
use crate::graph::Graph;
use crate::metrics::Metrics;

pub const RELAXATIONS: &str = "dagsp.relaxations";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which extreme the path finder optimizes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMode {
    Shortest,
    Longest,
}

impl PathMode {
    /// Whether `candidate` strictly beats `current` in this mode.
    #[must_use]
    pub fn improves(self, candidate: i64, current: Distance) -> bool {
        match (self, current) {
            (_, Distance::Unreachable) => true,
            (Self::Shortest, Distance::Reachable(d)) => candidate < d,
            (Self::Longest, Distance::Reachable(d)) => candidate > d,
        }
    }
}

impl fmt::Display for PathMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shortest => "shortest",
            Self::Longest => "longest",
        })
    }
}

/// Distance from the source: a finite sum of edge weights, or unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distance {
    Unreachable,
    Reachable(i64),
}

impl Distance {
    /// The finite distance, if any.
    #[must_use]
    pub const fn value(self) -> Option<i64> {
        match self {
            Self::Reachable(d) => Some(d),
            Self::Unreachable => None,
        }
    }

    #[must_use]
    pub const fn is_reachable(self) -> bool {
        matches!(self, Self::Reachable(_))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reachable(d) => write!(f, "{d}"),
            Self::Unreachable => f.write_str("UNREACHABLE"),
        }
    }
}

/// Serialized as the number, or `null` when unreachable.
impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// A reconstructed path together with its total distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalPath {
    /// Vertices from the source to the farthest vertex.
    ///
    /// Empty when nothing is reachable.
    pub path: Vec<usize>,
    /// Total weight of `path`.
    pub distance: Distance,
}

impl CriticalPath {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            path: Vec::new(),
            distance: Distance::Unreachable,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Per-vertex distances and parents for one `(source, mode)` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    mode: PathMode,
    source: usize,
    distances: Vec<Distance>,
    parents: Vec<Option<usize>>,
}

impl PathResult {
    fn new(vertex_count: usize, source: usize, mode: PathMode) -> Self {
        let mut distances = vec![Distance::Unreachable; vertex_count];
        distances[source] = Distance::Reachable(0);
        Self {
            mode,
            source,
            distances,
            parents: vec![None; vertex_count],
        }
    }

    #[must_use]
    pub const fn mode(&self) -> PathMode {
        self.mode
    }

    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    /// Distance to `v`; unreachable for vertices outside the graph.
    #[must_use]
    pub fn distance(&self, v: usize) -> Distance {
        self.distances.get(v).copied().unwrap_or(Distance::Unreachable)
    }

    /// Distances indexed by vertex.
    #[must_use]
    pub fn distances(&self) -> &[Distance] {
        &self.distances
    }

    /// Predecessor of `v` on its best path, `None` for the source and
    /// unreachable vertices.
    #[must_use]
    pub fn parent(&self, v: usize) -> Option<usize> {
        self.parents.get(v).copied().flatten()
    }

    /// Parents indexed by vertex.
    #[must_use]
    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    /// Number of vertices with a finite distance (the source included).
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_reachable()).count()
    }

    /// Vertices from the source to `target`, or empty if `target` is
    /// unreachable.
    #[must_use]
    pub fn reconstruct_path(&self, target: usize) -> Vec<usize> {
        if !self.distance(target).is_reachable() {
            return Vec::new();
        }

        let mut path = vec![target];
        let mut cursor = target;
        while let Some(prev) = self.parent(cursor) {
            path.push(prev);
            cursor = prev;
        }
        path.reverse();
        path
    }

    /// Path to the vertex with the greatest finite distance.
    ///
    /// Meant for results computed in [`PathMode::Longest`], where it yields
    /// the critical path. The lowest vertex index wins ties. Unreachable
    /// vertices never compete, so a lone source yields the one-vertex path
    /// `[source]` with distance `0`.
    #[must_use]
    pub fn longest_path(&self) -> CriticalPath {
        let mut best: Option<(usize, i64)> = None;
        for (v, d) in self.distances.iter().enumerate() {
            let Some(d) = d.value() else { continue };
            if best.is_none_or(|(_, max)| d > max) {
                best = Some((v, d));
            }
        }

        match best {
            Some((target, d)) => CriticalPath {
                path: self.reconstruct_path(target),
                distance: Distance::Reachable(d),
            },
            None => CriticalPath::empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// DagPathFinder
// ---------------------------------------------------------------------------

/// Relaxes a DAG's edges in a fixed topological order.
#[derive(Debug, Clone, Copy)]
pub struct DagPathFinder<'a> {
    graph: &'a Graph,
    order: &'a [usize],
}

impl<'a> DagPathFinder<'a> {
    /// Bind a graph to a topological order of its vertices.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidVertexReference`] if `order` names a
    /// vertex outside the graph.
    pub fn new(graph: &'a Graph, order: &'a [usize]) -> Result<Self, GraphError> {
        for &v in order {
            graph.check_vertex(v, VertexRole::OrderEntry)?;
        }
        Ok(Self { graph, order })
    }

    /// Compute distances from `source` in `mode`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidVertexReference`] if `source` is out of range.
    /// - [`GraphError::DistanceOverflow`] if a path sum leaves the `i64` range.
    #[instrument(skip(self, metrics), fields(vertices = self.graph.vertex_count()))]
    pub fn run(
        &self,
        source: usize,
        mode: PathMode,
        metrics: &mut Metrics,
    ) -> Result<PathResult, GraphError> {
        self.graph.check_vertex(source, VertexRole::PathSource)?;
        let mut result = PathResult::new(self.graph.vertex_count(), source, mode);

        for &u in self.order {
            let Distance::Reachable(base) = result.distances[u] else {
                continue;
            };

            for edge in self.graph.edges(u) {
                metrics.increment(RELAXATIONS);
                let v = edge.to;
                let weight = match mode {
                    PathMode::Shortest => edge.weight.for_shortest(),
                    PathMode::Longest => edge.weight.for_longest(),
                };
                let candidate = base
                    .checked_add(i64::from(weight))
                    .ok_or(GraphError::DistanceOverflow { from: u, to: v })?;

                if mode.improves(candidate, result.distances[v]) {
                    result.distances[v] = Distance::Reachable(candidate);
                    result.parents[v] = Some(u);
                }
            }
        }

        debug!(
            %mode,
            source,
            reachable = result.reachable_count(),
            "dag path relaxation complete"
        );
        Ok(result)
    }

    /// Shorthand for [`DagPathFinder::run`] in [`PathMode::Shortest`].
    ///
    /// # Errors
    ///
    /// See [`DagPathFinder::run`].
    pub fn shortest(&self, source: usize, metrics: &mut Metrics) -> Result<PathResult, GraphError> {
        self.run(source, PathMode::Shortest, metrics)
    }

    /// Shorthand for [`DagPathFinder::run`] in [`PathMode::Longest`].
    ///
    /// # Errors
    ///
    /// See [`DagPathFinder::run`].
    pub fn longest(&self, source: usize, metrics: &mut Metrics) -> Result<PathResult, GraphError> {
        self.run(source, PathMode::Longest, metrics)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
