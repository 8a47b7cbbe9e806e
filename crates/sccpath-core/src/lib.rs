//! sccpath-core library.
//!
//! Strongly-connected-component decomposition, condensation, topological
//! ordering and DAG shortest/longest paths over a weighted directed graph.
//!
//! # Conventions
//!
//! - **Errors**: library stages return [`GraphError`]; config loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Metrics**: every stage takes `&mut Metrics`; there is no global state.

#![forbid(unsafe_code)]

pub mod config;
pub mod dagsp;
pub mod error;
pub mod graph;
pub mod input;
pub mod metrics;
pub mod pipeline;
pub mod scc;
pub mod topo;

pub use dagsp::{CriticalPath, DagPathFinder, Distance, PathMode, PathResult};
pub use error::{ErrorCode, GraphError, VertexRole};
pub use graph::{Edge, EdgeWeight, Graph};
pub use input::{EdgeRecord, GraphDocument};
pub use metrics::{Metrics, Timing};
pub use pipeline::Analysis;
pub use scc::SccDecomposition;
pub use topo::topological_order;
