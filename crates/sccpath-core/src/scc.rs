//! Kosaraju strongly-connected-component decomposition and condensation.
//!
//! # Algorithm
//!
//! 1. **Finish-order pass** over the original graph. Roots are taken in
//!    vertex order `0..V`; a vertex is recorded only after every edge out of
//!    it has been examined (post-order).
//! 2. **Assignment pass** over the transposed graph. Vertices are taken in
//!    *decreasing* finish order; each still-unassigned vertex starts a
//!    traversal that claims exactly one SCC under a fresh id.
//! 3. **Condensation**: every original edge whose endpoints landed in
//!    different components becomes an aggregated edge between those
//!    components (see [`Graph::add_condensation_edge`]).
//!
//! Both passes run on an explicit stack of `(vertex, next_edge)` frames, so
//! traversal depth is bounded by heap memory rather than the call stack.
//! The frame stack visits neighbors in the same order a recursive DFS would,
//! which keeps component ids and member order stable across runs.

#![allow(clippy::module_name_repetitions)]

use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::Graph;
use crate::metrics::Metrics;

pub const DFS1_VISITS: &str = "scc.dfs1.visits";
pub const DFS1_EDGES: &str = "scc.dfs1.edges";
pub const DFS2_VISITS: &str = "scc.dfs2.visits";
pub const DFS2_EDGES: &str = "scc.dfs2.edges";

// ---------------------------------------------------------------------------
// SccDecomposition
// ---------------------------------------------------------------------------

/// Component assignment for every vertex plus the derived condensation DAG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SccDecomposition {
    component_of: Vec<usize>,
    components: Vec<Vec<usize>>,
    condensation: Graph,
}

impl SccDecomposition {
    /// Decompose `graph` into strongly connected components.
    ///
    /// Component ids are assigned in discovery order during the assignment
    /// pass; members of each component are listed in the order the
    /// transposed traversal reached them.
    ///
    /// # Errors
    ///
    /// Only fails if the condensation build references a component id out
    /// of range, which would indicate a bug in the assignment pass.
    #[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
    pub fn compute(graph: &Graph, metrics: &mut Metrics) -> Result<Self, GraphError> {
        let n = graph.vertex_count();

        // --- Pass 1: finish order on the original graph ---
        let mut visited = vec![false; n];
        let mut finish_stack: Vec<usize> = Vec::with_capacity(n);
        for root in 0..n {
            if visited[root] {
                continue;
            }
            depth_first(
                graph,
                root,
                &mut visited,
                metrics,
                Counters::FINISH_ORDER,
                |_| {},
                |u| finish_stack.push(u),
            );
        }

        // --- Pass 2: claim components on the transpose, latest finish first ---
        let transposed = graph.transpose();
        visited.fill(false);
        let mut component_of = vec![0; n];
        let mut components: Vec<Vec<usize>> = Vec::new();

        while let Some(u) = finish_stack.pop() {
            if visited[u] {
                continue;
            }
            let id = components.len();
            let mut members = Vec::new();
            depth_first(
                &transposed,
                u,
                &mut visited,
                metrics,
                Counters::ASSIGNMENT,
                |v| {
                    component_of[v] = id;
                    members.push(v);
                },
                |_| {},
            );
            components.push(members);
        }

        // --- Pass 3: aggregate cross-component edges ---
        let mut condensation = Graph::new(components.len());
        for (u, edge) in graph.iter_edges() {
            let from = component_of[u];
            let to = component_of[edge.to];
            if from != to {
                condensation.add_condensation_edge(from, to, edge.weight.for_shortest())?;
                if edge.is_aggregated() {
                    condensation.add_condensation_edge(from, to, edge.weight.for_longest())?;
                }
            }
        }

        debug!(
            components = components.len(),
            condensation_edges = condensation.edge_count(),
            "scc decomposition complete"
        );

        Ok(Self {
            component_of,
            components,
            condensation,
        })
    }

    /// Number of strongly connected components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Component id of vertex `v`, or `None` if `v` is not in the graph.
    #[must_use]
    pub fn component_of(&self, v: usize) -> Option<usize> {
        self.component_of.get(v).copied()
    }

    /// Component id for every vertex, indexed by vertex.
    #[must_use]
    pub fn assignment(&self) -> &[usize] {
        &self.component_of
    }

    /// Vertex groups indexed by component id.
    #[must_use]
    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    /// Members of component `id`. Empty for unknown ids.
    #[must_use]
    pub fn members(&self, id: usize) -> &[usize] {
        self.components.get(id).map_or(&[], Vec::as_slice)
    }

    /// Number of components with more than one vertex.
    #[must_use]
    pub fn cyclic_component_count(&self) -> usize {
        self.components.iter().filter(|c| c.len() > 1).count()
    }

    /// The condensation DAG: one vertex per component id.
    #[must_use]
    pub const fn condensation(&self) -> &Graph {
        &self.condensation
    }
}

// ---------------------------------------------------------------------------
// Iterative depth-first traversal
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
struct Counters {
    visits: &'static str,
    edges: &'static str,
}

impl Counters {
    const FINISH_ORDER: Self = Self {
        visits: DFS1_VISITS,
        edges: DFS1_EDGES,
    };
    const ASSIGNMENT: Self = Self {
        visits: DFS2_VISITS,
        edges: DFS2_EDGES,
    };
}

/// Depth-first traversal from `root` over unvisited vertices.
///
/// `on_enter` fires when a vertex is first reached (pre-order) and
/// `on_finish` after its last edge has been examined (post-order).
fn depth_first(
    graph: &Graph,
    root: usize,
    visited: &mut [bool],
    metrics: &mut Metrics,
    counters: Counters,
    mut on_enter: impl FnMut(usize),
    mut on_finish: impl FnMut(usize),
) {
    let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
    visited[root] = true;
    metrics.increment(counters.visits);
    on_enter(root);

    while let Some(frame) = stack.last_mut() {
        let (u, next) = *frame;
        let Some(edge) = graph.edges(u).get(next) else {
            stack.pop();
            on_finish(u);
            continue;
        };
        frame.1 += 1;
        metrics.increment(counters.edges);

        let v = edge.to;
        if !visited[v] {
            visited[v] = true;
            metrics.increment(counters.visits);
            on_enter(v);
            stack.push((v, 0));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
