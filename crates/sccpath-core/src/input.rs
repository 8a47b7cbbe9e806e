//! JSON graph documents: loading, validation and conversion to [`Graph`].
//!
//! # Format
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 4,
//!   "edges": [{ "u": 0, "v": 1, "w": 3 }],
//!   "source": 0,
//!   "weight_model": "edge"
//! }
//! ```
//!
//! `weight_model` is carried through for display only. Documents with
//! `"directed": false` are still analyzed as directed graphs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::error::{GraphError, VertexRole};
use crate::graph::Graph;

/// Largest vertex count a document may declare.
pub const MAX_VERTICES: usize = 1 << 24;

/// One `{u, v, w}` entry of the edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: usize,
    pub v: usize,
    pub w: i32,
}

/// A serialized graph plus the designated source vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default = "default_true")]
    pub directed: bool,
    pub n: usize,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub source: usize,
    #[serde(default = "default_weight_model")]
    pub weight_model: String,
}

impl GraphDocument {
    /// Read and parse a document from `path`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Io`] if the file cannot be read.
    /// - [`GraphError::Malformed`] if it is not a valid document.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse a document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Malformed`] if the JSON does not describe a
    /// graph document.
    pub fn from_json_str(content: &str) -> Result<Self, GraphError> {
        let doc: Self = serde_json::from_str(content)?;
        if !doc.directed {
            warn!("graph document is marked undirected; analyzing edges as directed");
        }
        Ok(doc)
    }

    /// Check `n` against [`MAX_VERTICES`], then every edge endpoint and the
    /// source against `[0, n)`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::TooManyVertices`] if `n` exceeds [`MAX_VERTICES`].
    /// - [`GraphError::InvalidVertexReference`] for the first offending index.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.n > MAX_VERTICES {
            return Err(GraphError::TooManyVertices {
                vertex_count: self.n,
                limit: MAX_VERTICES,
            });
        }

        let check = |vertex: usize, role: VertexRole| {
            if vertex < self.n {
                Ok(())
            } else {
                Err(GraphError::InvalidVertexReference {
                    role,
                    vertex,
                    vertex_count: self.n,
                })
            }
        };

        for edge in &self.edges {
            check(edge.u, VertexRole::EdgeSource)?;
            check(edge.v, VertexRole::EdgeTarget)?;
        }
        check(self.source, VertexRole::PathSource)
    }

    /// Build the graph, preserving edge-list order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooManyVertices`] or
    /// [`GraphError::InvalidVertexReference`] if validation fails.
    pub fn to_graph(&self) -> Result<Graph, GraphError> {
        self.validate()?;
        let mut graph = Graph::new(self.n);
        for edge in &self.edges {
            graph.add_edge(edge.u, edge.v, edge.w)?;
        }
        Ok(graph)
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Malformed`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

const fn default_true() -> bool {
    true
}

fn default_weight_model() -> String {
    "edge".to_string()
}
