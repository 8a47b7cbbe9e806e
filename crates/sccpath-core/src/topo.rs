//! Cycle-checking topological sort.
//!
//! Three-color depth-first search: a vertex is *in progress* from the moment
//! it is entered until its last outgoing edge has been examined, then
//! *finished*. Reaching an in-progress vertex means the graph has a cycle and
//! the whole sort fails; no partial order is ever returned.
//!
//! The order is the reverse of the finish sequence (reverse post-order).

use tracing::{error, instrument};

use crate::error::GraphError;
use crate::graph::Graph;
use crate::metrics::Metrics;

pub const DFS_VISITS: &str = "topo.dfs.visits";
pub const DFS_EDGES: &str = "topo.dfs.edges";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Finished,
}

/// Compute a topological order of `graph`.
///
/// Roots are tried in vertex order `0..V`. For every edge `u -> v` the
/// returned order places `u` before `v`.
///
/// # Errors
///
/// Returns [`GraphError::CycleDetected`] naming the first in-progress vertex
/// reached again.
#[instrument(skip_all, fields(vertices = graph.vertex_count()))]
pub fn topological_order(graph: &Graph, metrics: &mut Metrics) -> Result<Vec<usize>, GraphError> {
    let n = graph.vertex_count();
    let mut marks = vec![Mark::Unvisited; n];
    let mut finished: Vec<usize> = Vec::with_capacity(n);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::InProgress;
        metrics.increment(DFS_VISITS);
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (u, next) = *frame;
            let Some(edge) = graph.edges(u).get(next) else {
                marks[u] = Mark::Finished;
                finished.push(u);
                stack.pop();
                continue;
            };
            frame.1 += 1;
            metrics.increment(DFS_EDGES);

            let v = edge.to;
            match marks[v] {
                Mark::InProgress => {
                    error!(vertex = v, from = u, "cycle detected during topological sort");
                    return Err(GraphError::CycleDetected { vertex: v });
                }
                Mark::Unvisited => {
                    marks[v] = Mark::InProgress;
                    metrics.increment(DFS_VISITS);
                    stack.push((v, 0));
                }
                Mark::Finished => {}
            }
        }
    }

    finished.reverse();
    Ok(finished)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(u, v) in edges {
            g.add_edge(u, v, 1).unwrap();
        }
        g
    }

    fn sort(g: &Graph) -> Result<Vec<usize>, GraphError> {
        topological_order(g, &mut Metrics::new())
    }

    fn position(order: &[usize], v: usize) -> usize {
        order.iter().position(|&x| x == v).unwrap()
    }

    #[test]
    fn empty_graph_has_empty_order() {
        assert_eq!(sort(&Graph::new(0)).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn single_vertex() {
        assert_eq!(sort(&Graph::new(1)).unwrap(), vec![0]);
    }

    #[test]
    fn chain_is_sorted_in_edge_order() {
        let g = graph_from(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(sort(&g).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn diamond_order_is_reverse_postorder() {
        let g = graph_from(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert_eq!(sort(&g).unwrap(), vec![0, 2, 1, 3]);
    }

    #[test]
    fn every_edge_points_forward() {
        let edges = [(5, 2), (5, 0), (4, 0), (4, 1), (2, 3), (3, 1)];
        let g = graph_from(6, &edges);
        let order = sort(&g).unwrap();

        assert_eq!(order.len(), 6);
        for (u, v) in edges {
            assert!(position(&order, u) < position(&order, v), "{u} before {v}");
        }
    }

    #[test]
    fn cycle_is_reported_without_partial_order() {
        let g = graph_from(3, &[(0, 1), (1, 2), (2, 0)]);
        let err = sort(&g).unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected { vertex: 0 }));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let g = graph_from(2, &[(0, 1), (1, 1)]);
        assert!(matches!(
            sort(&g),
            Err(GraphError::CycleDetected { vertex: 1 })
        ));
    }

    #[test]
    fn counters_track_visits_and_edges() {
        let g = graph_from(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let mut metrics = Metrics::new();
        topological_order(&g, &mut metrics).unwrap();

        assert_eq!(metrics.counter(DFS_VISITS), 4);
        assert_eq!(metrics.counter(DFS_EDGES), 4);
    }

    #[test]
    fn long_chain_sorts_without_recursion() {
        let n = 200_000;
        let mut g = Graph::new(n);
        for v in 0..n - 1 {
            g.add_edge(v, v + 1, 1).unwrap();
        }

        let order = sort(&g).unwrap();
        assert_eq!(order, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn long_chain_closing_into_a_cycle_fails() {
        let n = 200_000;
        let mut g = Graph::new(n);
        for v in 0..n - 1 {
            g.add_edge(v, v + 1, 1).unwrap();
        }
        g.add_edge(n - 1, 0, 1).unwrap();

        assert!(matches!(sort(&g), Err(GraphError::CycleDetected { vertex: 0 })));
    }
}
