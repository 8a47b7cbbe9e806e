//! The four-stage analysis pipeline.
//!
//! ```text
//! Graph
//!   ↓  SccDecomposition::compute        (timer "SCC")
//! component map + condensation DAG
//!   ↓  topological_order                (timer "TopoSort")
//! order of components
//!   ↓  DagPathFinder::shortest          (timer "DAG-SSSP")
//!   ↓  DagPathFinder::longest           (timer "DAG-LongestPath")
//! Analysis
//! ```
//!
//! Every stage consumes the previous stage's output; any failure aborts the
//! remaining stages.

use tracing::{info, instrument};

use crate::dagsp::{CriticalPath, DagPathFinder, PathResult};
use crate::error::{GraphError, VertexRole};
use crate::graph::Graph;
use crate::metrics::Metrics;
use crate::scc::SccDecomposition;
use crate::topo::topological_order;

pub const TIMER_SCC: &str = "SCC";
pub const TIMER_TOPO: &str = "TopoSort";
pub const TIMER_SHORTEST: &str = "DAG-SSSP";
pub const TIMER_LONGEST: &str = "DAG-LongestPath";

/// Results of one full pipeline run over a graph and source vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Source vertex in the original graph.
    pub source: usize,
    /// Component containing `source`; the path finder starts here.
    pub source_component: usize,
    /// Component assignment and condensation DAG.
    pub scc: SccDecomposition,
    /// Topological order of component ids.
    pub order: Vec<usize>,
    /// Shortest distances between components.
    pub shortest: PathResult,
    /// Longest distances between components.
    pub longest: PathResult,
}

impl Analysis {
    /// Run every stage on `graph` from `source`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidVertexReference`] if `source` is not a vertex.
    /// - [`GraphError::CycleDetected`] if the condensation is not acyclic.
    /// - [`GraphError::DistanceOverflow`] if a path sum overflows.
    #[instrument(skip(graph, metrics), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
    pub fn run(graph: &Graph, source: usize, metrics: &mut Metrics) -> Result<Self, GraphError> {
        graph.check_vertex(source, VertexRole::PathSource)?;

        let scc = metrics.timed(TIMER_SCC, |m| SccDecomposition::compute(graph, m))?;
        let order = metrics.timed(TIMER_TOPO, |m| topological_order(scc.condensation(), m))?;

        let source_component =
            scc.component_of(source)
                .ok_or(GraphError::InvalidVertexReference {
                    role: VertexRole::PathSource,
                    vertex: source,
                    vertex_count: graph.vertex_count(),
                })?;

        let finder = DagPathFinder::new(scc.condensation(), &order)?;
        let shortest = metrics.timed(TIMER_SHORTEST, |m| finder.shortest(source_component, m))?;
        let longest = metrics.timed(TIMER_LONGEST, |m| finder.longest(source_component, m))?;

        info!(
            components = scc.component_count(),
            cyclic = scc.cyclic_component_count(),
            source_component,
            "analysis complete"
        );

        Ok(Self {
            source,
            source_component,
            scc,
            order,
            shortest,
            longest,
        })
    }

    /// The longest path from the source component (the critical path).
    #[must_use]
    pub fn critical_path(&self) -> CriticalPath {
        self.longest.longest_path()
    }

    /// Shortest path to the last component in topological order that the
    /// source component reaches, as `(target, path)`.
    ///
    /// The source component itself qualifies, so this is `None` only for an
    /// empty order.
    #[must_use]
    pub fn example_shortest_path(&self) -> Option<(usize, Vec<usize>)> {
        let target = self
            .order
            .iter()
            .rev()
            .copied()
            .find(|&c| self.shortest.distance(c).is_reachable())?;
        Some((target, self.shortest.reconstruct_path(target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dagsp::Distance;

    fn graph_from(n: usize, edges: &[(usize, usize, i32)]) -> Graph {
        let mut g = Graph::new(n);
        for &(u, v, w) in edges {
            g.add_edge(u, v, w).unwrap();
        }
        g
    }

    #[test]
    fn cycle_feeding_a_tail_is_analyzed_on_components() {
        // {0,1,2} ring, then 2 -> 3 (w=4) and 0 -> 3 (w=9), 3 -> 4 (w=1).
        let g = graph_from(
            5,
            &[(0, 1, 1), (1, 2, 1), (2, 0, 1), (2, 3, 4), (0, 3, 9), (3, 4, 1)],
        );
        let mut metrics = Metrics::new();
        let analysis = Analysis::run(&g, 0, &mut metrics).unwrap();

        assert_eq!(analysis.scc.component_count(), 3);
        let ring = analysis.source_component;
        let c3 = analysis.scc.component_of(3).unwrap();
        let c4 = analysis.scc.component_of(4).unwrap();
        assert_eq!(analysis.scc.component_of(1), Some(ring));

        assert_eq!(analysis.shortest.distance(c3), Distance::Reachable(4));
        assert_eq!(analysis.longest.distance(c3), Distance::Reachable(9));
        assert_eq!(analysis.longest.distance(c4), Distance::Reachable(10));

        let critical = analysis.critical_path();
        assert_eq!(critical.path, vec![ring, c3, c4]);
        assert_eq!(critical.distance, Distance::Reachable(10));

        let (target, path) = analysis.example_shortest_path().unwrap();
        assert_eq!(target, c4);
        assert_eq!(path, vec![ring, c3, c4]);
    }

    #[test]
    fn stage_timers_are_recorded_in_order() {
        let g = graph_from(2, &[(0, 1, 1)]);
        let mut metrics = Metrics::new();
        Analysis::run(&g, 0, &mut metrics).unwrap();

        let names: Vec<&str> = metrics.timings().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![TIMER_SCC, TIMER_TOPO, TIMER_SHORTEST, TIMER_LONGEST]
        );
        assert_eq!(metrics.counter(crate::dagsp::RELAXATIONS), 2);
    }

    #[test]
    fn invalid_source_aborts_before_any_stage() {
        let g = Graph::new(2);
        let mut metrics = Metrics::new();
        let err = Analysis::run(&g, 3, &mut metrics).unwrap_err();

        assert!(matches!(err, GraphError::InvalidVertexReference { .. }));
        assert!(metrics.timings().is_empty());
    }
}
