//! Adjacency-list graph with weighted, optionally-ranged edges.
//!
//! # Edge kinds
//!
//! Edges added with [`Graph::add_edge`] are *simple*: they carry a single
//! weight. Edges added with [`Graph::add_condensation_edge`] are *aggregated*:
//! every call targeting the same `(u, v)` pair widens one shared
//! `[min, max]` range instead of appending a parallel edge. The condensation
//! graph built by [`crate::scc`] only ever contains aggregated edges.
//!
//! # Ordering
//!
//! Outgoing edges keep their insertion order. Traversal order in every stage
//! of the pipeline depends on it, so two graphs built from the same edge
//! list in the same order always analyze identically.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;

use crate::error::{GraphError, VertexRole};

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// Weight carried by an edge: one value, or a min/max range after aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeWeight {
    /// Edge copied verbatim from an input edge list.
    Simple { weight: i32 },
    /// Edge synthesized by merging one or more parallel edges.
    Range { min: i32, max: i32 },
}

impl EdgeWeight {
    /// Weight used when minimizing: the range minimum, or the plain weight.
    #[must_use]
    pub const fn for_shortest(self) -> i32 {
        match self {
            Self::Simple { weight } => weight,
            Self::Range { min, .. } => min,
        }
    }

    /// Weight used when maximizing: the range maximum, or the plain weight.
    #[must_use]
    pub const fn for_longest(self) -> i32 {
        match self {
            Self::Simple { weight } => weight,
            Self::Range { max, .. } => max,
        }
    }

    /// Widen this weight so it also covers `w`. Always yields a range.
    #[must_use]
    pub fn widened(self, w: i32) -> Self {
        match self {
            Self::Simple { weight } => Self::Range {
                min: weight.min(w),
                max: weight.max(w),
            },
            Self::Range { min, max } => Self::Range {
                min: min.min(w),
                max: max.max(w),
            },
        }
    }
}

/// A directed edge stored in the adjacency list of its source vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Target vertex.
    pub to: usize,
    /// Simple weight or aggregated range.
    pub weight: EdgeWeight,
}

impl Edge {
    /// A simple edge with a single weight.
    #[must_use]
    pub const fn simple(to: usize, weight: i32) -> Self {
        Self {
            to,
            weight: EdgeWeight::Simple { weight },
        }
    }

    /// An aggregated edge covering `[min, max]`.
    #[must_use]
    pub const fn ranged(to: usize, min: i32, max: i32) -> Self {
        Self {
            to,
            weight: EdgeWeight::Range { min, max },
        }
    }

    /// Return `true` if this edge was synthesized by aggregation.
    #[must_use]
    pub const fn is_aggregated(&self) -> bool {
        matches!(self.weight, EdgeWeight::Range { .. })
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Directed graph over vertices `0..vertex_count` with per-vertex edge lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Graph {
    adj: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    /// Create a graph with `vertex_count` vertices and no edges.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adj: vec![Vec::new(); vertex_count],
            edge_count: 0,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of stored edges (aggregated edges count once).
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Outgoing edges of `u` in insertion order. Empty for unknown vertices.
    #[must_use]
    pub fn edges(&self, u: usize) -> &[Edge] {
        self.adj.get(u).map_or(&[], Vec::as_slice)
    }

    /// Iterate `(source, edge)` pairs, vertex by vertex, in insertion order.
    pub fn iter_edges(&self) -> impl Iterator<Item = (usize, &Edge)> + '_ {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(u, edges)| edges.iter().map(move |e| (u, e)))
    }

    /// Append a simple edge `u -> v` with weight `w`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidVertexReference`] if either endpoint is
    /// outside `[0, vertex_count)`.
    pub fn add_edge(&mut self, u: usize, v: usize, w: i32) -> Result<(), GraphError> {
        self.check_endpoints(u, v)?;
        self.adj[u].push(Edge::simple(v, w));
        self.edge_count += 1;
        Ok(())
    }

    /// Merge `w` into the edge `u -> v`, creating it as `[w, w]` if absent.
    ///
    /// Scans `u`'s outgoing list for an edge already targeting `v`; the first
    /// match is widened in place, so parallel edges never accumulate.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidVertexReference`] if either endpoint is
    /// outside `[0, vertex_count)`.
    pub fn add_condensation_edge(&mut self, u: usize, v: usize, w: i32) -> Result<(), GraphError> {
        self.check_endpoints(u, v)?;
        if let Some(existing) = self.adj[u].iter_mut().find(|e| e.to == v) {
            existing.weight = existing.weight.widened(w);
            return Ok(());
        }
        self.adj[u].push(Edge::ranged(v, w, w));
        self.edge_count += 1;
        Ok(())
    }

    /// Return a new graph with every edge reversed and its weight preserved.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut reversed = Self::new(self.vertex_count());
        for (u, edge) in self.iter_edges() {
            reversed.adj[edge.to].push(Edge {
                to: u,
                weight: edge.weight,
            });
        }
        reversed.edge_count = self.edge_count;
        reversed
    }

    /// BLAKE3 fingerprint of the vertex count and the ordered edge list.
    ///
    /// Equal hashes mean the pipeline will produce identical results.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.vertex_count() as u64).to_le_bytes());
        for (u, edge) in self.iter_edges() {
            hasher.update(&(u as u64).to_le_bytes());
            hasher.update(&(edge.to as u64).to_le_bytes());
            match edge.weight {
                EdgeWeight::Simple { weight } => {
                    hasher.update(&[0]);
                    hasher.update(&weight.to_le_bytes());
                }
                EdgeWeight::Range { min, max } => {
                    hasher.update(&[1]);
                    hasher.update(&min.to_le_bytes());
                    hasher.update(&max.to_le_bytes());
                }
            }
        }
        format!("blake3:{}", hasher.finalize().to_hex())
    }

    /// Check that `v` is a vertex of this graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidVertexReference`] tagged with `role`.
    pub fn check_vertex(&self, v: usize, role: VertexRole) -> Result<(), GraphError> {
        if v < self.vertex_count() {
            Ok(())
        } else {
            Err(GraphError::InvalidVertexReference {
                role,
                vertex: v,
                vertex_count: self.vertex_count(),
            })
        }
    }

    fn check_endpoints(&self, u: usize, v: usize) -> Result<(), GraphError> {
        self.check_vertex(u, VertexRole::EdgeSource)?;
        self.check_vertex(v, VertexRole::EdgeTarget)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_preserves_insertion_order() {
        let mut g = Graph::new(3);
        g.add_edge(0, 2, 4).unwrap();
        g.add_edge(0, 1, 7).unwrap();
        g.add_edge(0, 2, 1).unwrap();

        let targets: Vec<usize> = g.edges(0).iter().map(|e| e.to).collect();
        assert_eq!(targets, vec![2, 1, 2], "parallel simple edges are kept");
        assert_eq!(g.edge_count(), 3);
        assert!(g.edges(0).iter().all(|e| !e.is_aggregated()));
    }

    #[test]
    fn add_edge_rejects_out_of_range_endpoints() {
        let mut g = Graph::new(2);
        let err = g.add_edge(0, 2, 1).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidVertexReference {
                role: VertexRole::EdgeTarget,
                vertex: 2,
                vertex_count: 2
            }
        ));

        let err = g.add_edge(5, 0, 1).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidVertexReference {
                role: VertexRole::EdgeSource,
                vertex: 5,
                ..
            }
        ));
        assert_eq!(g.edge_count(), 0, "rejected edges are not stored");
    }

    #[test]
    fn condensation_edges_merge_into_one_range() {
        let mut g = Graph::new(3);
        g.add_condensation_edge(0, 1, 5).unwrap();
        g.add_condensation_edge(0, 2, 9).unwrap();
        g.add_condensation_edge(0, 1, 3).unwrap();
        g.add_condensation_edge(0, 1, 8).unwrap();

        assert_eq!(g.edges(0).len(), 2, "one edge per target");
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edges(0)[0], Edge::ranged(1, 3, 8));
        assert_eq!(g.edges(0)[1], Edge::ranged(2, 9, 9));
        assert!(g.edges(0)[0].is_aggregated());
    }

    #[test]
    fn condensation_edge_widens_a_simple_edge() {
        let mut g = Graph::new(2);
        g.add_edge(0, 1, 6).unwrap();
        g.add_condensation_edge(0, 1, 2).unwrap();

        assert_eq!(g.edges(0), &[Edge::ranged(1, 2, 6)]);
    }

    #[test]
    fn weight_selection_falls_back_to_plain_weight() {
        let simple = EdgeWeight::Simple { weight: 4 };
        assert_eq!(simple.for_shortest(), 4);
        assert_eq!(simple.for_longest(), 4);

        let range = EdgeWeight::Range { min: 2, max: 9 };
        assert_eq!(range.for_shortest(), 2);
        assert_eq!(range.for_longest(), 9);
    }

    #[test]
    fn transpose_reverses_every_edge() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, 1).unwrap();
        g.add_edge(0, 2, 2).unwrap();
        g.add_edge(1, 2, 3).unwrap();

        let t = g.transpose();
        assert_eq!(t.vertex_count(), 3);
        assert_eq!(t.edge_count(), 3);
        assert!(t.edges(0).is_empty());
        assert_eq!(t.edges(1), &[Edge::simple(0, 1)]);
        assert_eq!(t.edges(2), &[Edge::simple(0, 2), Edge::simple(1, 3)]);
    }

    #[test]
    fn edges_of_unknown_vertex_is_empty() {
        let g = Graph::new(1);
        assert!(g.edges(7).is_empty());
    }

    #[test]
    fn content_hash_tracks_edge_order() {
        let mut a = Graph::new(3);
        a.add_edge(0, 1, 1).unwrap();
        a.add_edge(0, 2, 1).unwrap();

        let mut b = Graph::new(3);
        b.add_edge(0, 2, 1).unwrap();
        b.add_edge(0, 1, 1).unwrap();

        assert!(a.content_hash().starts_with("blake3:"));
        assert_eq!(a.content_hash(), a.clone().content_hash());
        assert_ne!(a.content_hash(), b.content_hash(), "order is observable");
    }
}
