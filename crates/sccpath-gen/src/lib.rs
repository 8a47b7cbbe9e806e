//! Deterministic synthetic graph datasets.
//!
//! Every generator draws from one seeded [`StdRng`], so a given seed always
//! yields the same edge lists in the same order. Weights are uniform in
//! `[1, 10]`.
//!
//! The [`standard_suite`] is the fixed set of nine documents (three small,
//! three medium, three large) used for benchmarking the pipeline on graphs
//! with known structure: a single cycle, pure DAGs, chained ring blocks,
//! dense graphs and sparse graphs.

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sccpath_core::input::{EdgeRecord, GraphDocument};
use tracing::{info, instrument};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

const MIN_WEIGHT: i32 = 1;
const MAX_WEIGHT: i32 = 10;

/// Seeded edge-list generator.
#[derive(Debug, Clone)]
pub struct DatasetGenerator {
    rng: StdRng,
}

impl DatasetGenerator {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn weight(&mut self) -> i32 {
        self.rng.gen_range(MIN_WEIGHT..=MAX_WEIGHT)
    }

    fn edge(&mut self, u: usize, v: usize) -> EdgeRecord {
        EdgeRecord {
            u,
            v,
            w: self.weight(),
        }
    }

    /// Forward edges `i -> j` (`i < j`), each kept with probability
    /// `density`, stopping once `n(n-1)/2 * density` edges exist.
    pub fn dag(&mut self, n: usize, density: f64) -> Vec<EdgeRecord> {
        let density = density.clamp(0.0, 1.0);
        let pairs = n * n.saturating_sub(1) / 2;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cap = (pairs as f64 * density) as usize;

        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if edges.len() >= cap {
                    return edges;
                }
                if self.rng.gen_bool(density) {
                    edges.push(self.edge(i, j));
                }
            }
        }
        edges
    }

    /// A ring over `0..cycle_size` followed by a chain through the
    /// remaining vertices.
    pub fn single_cycle(&mut self, n: usize, cycle_size: usize) -> Vec<EdgeRecord> {
        let cycle_size = cycle_size.min(n);
        let mut edges = Vec::with_capacity(n);
        for i in 0..cycle_size {
            edges.push(self.edge(i, (i + 1) % cycle_size));
        }
        for i in cycle_size.max(1)..n {
            edges.push(self.edge(i - 1, i));
        }
        edges
    }

    /// `components` ring blocks of `n / components` vertices each, with one
    /// bridge edge from every block head to the next block head.
    ///
    /// Vertices past the last full block stay isolated.
    pub fn multiple_sccs(&mut self, n: usize, components: usize) -> Vec<EdgeRecord> {
        if components == 0 {
            return Vec::new();
        }
        let block = n / components;
        let mut edges = Vec::new();

        for c in 0..components {
            let start = c * block;
            if block < 2 {
                continue;
            }
            for i in 0..block - 1 {
                edges.push(self.edge(start + i, start + i + 1));
            }
            edges.push(self.edge(start + block - 1, start));
        }

        for c in 0..components - 1 {
            edges.push(self.edge(c * block, (c + 1) * block));
        }
        edges
    }

    /// Every ordered pair `i != j` kept with probability `density`.
    ///
    /// Each pair is considered once, so no edge is ever duplicated.
    pub fn dense(&mut self, n: usize, density: f64) -> Vec<EdgeRecord> {
        let density = density.clamp(0.0, 1.0);
        let mut edges = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if i != j && self.rng.gen_bool(density) {
                    edges.push(self.edge(i, j));
                }
            }
        }
        edges
    }

    /// A spine chain `0 -> 1 -> ... -> n-1` plus `n / 2` random draws, of
    /// which self loops are discarded.
    pub fn sparse(&mut self, n: usize) -> Vec<EdgeRecord> {
        let mut edges = Vec::with_capacity(n + n / 2);
        for i in 1..n {
            edges.push(self.edge(i - 1, i));
        }
        for _ in 0..n / 2 {
            let u = self.rng.gen_range(0..n);
            let v = self.rng.gen_range(0..n);
            if u != v {
                edges.push(self.edge(u, v));
            }
        }
        edges
    }
}

/// One named document of the standard suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// File stem, e.g. `small_1`.
    pub name: &'static str,
    pub description: &'static str,
    pub document: GraphDocument,
}

fn document(n: usize, edges: Vec<EdgeRecord>) -> GraphDocument {
    GraphDocument {
        directed: true,
        n,
        edges,
        source: 0,
        weight_model: "edge".to_string(),
    }
}

/// Build the nine standard datasets from one generator seeded with `seed`.
#[must_use]
pub fn standard_suite(seed: u64) -> Vec<Dataset> {
    let mut rng = DatasetGenerator::new(seed);

    vec![
        Dataset {
            name: "small_1",
            description: "Small: 8 nodes, single cycle (size 3)",
            document: document(8, rng.single_cycle(8, 3)),
        },
        Dataset {
            name: "small_2",
            description: "Small: 10 nodes, pure DAG, sparse",
            document: document(10, rng.dag(10, 0.3)),
        },
        Dataset {
            name: "small_3",
            description: "Small: 7 nodes, 2 SCCs",
            document: document(7, rng.multiple_sccs(7, 2)),
        },
        Dataset {
            name: "medium_1",
            description: "Medium: 15 nodes, 3 SCCs",
            document: document(15, rng.multiple_sccs(15, 3)),
        },
        Dataset {
            name: "medium_2",
            description: "Medium: 18 nodes, dense graph",
            document: document(18, rng.dense(18, 0.2)),
        },
        Dataset {
            name: "medium_3",
            description: "Medium: 12 nodes, sparse graph",
            document: document(12, rng.sparse(12)),
        },
        Dataset {
            name: "large_1",
            description: "Large: 30 nodes, 5 SCCs",
            document: document(30, rng.multiple_sccs(30, 5)),
        },
        Dataset {
            name: "large_2",
            description: "Large: 40 nodes, dense graph",
            document: document(40, rng.dense(40, 0.15)),
        },
        Dataset {
            name: "large_3",
            description: "Large: 25 nodes, sparse graph",
            document: document(25, rng.sparse(25)),
        },
    ]
}

/// Write the standard suite into `out_dir` as `<name>.json`, creating the
/// directory if needed. Returns the written paths in suite order.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
#[instrument(skip_all, fields(out_dir = %out_dir.display(), seed = seed))]
pub fn write_suite(out_dir: &Path, seed: u64) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut written = Vec::new();
    for dataset in standard_suite(seed) {
        let path = out_dir.join(format!("{}.json", dataset.name));
        let json = dataset
            .document
            .to_json_pretty()
            .with_context(|| format!("Failed to serialize {}", dataset.name))?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(
            path = %path.display(),
            edges = dataset.document.edges.len(),
            "generated {}",
            dataset.description
        );
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sccpath_core::metrics::Metrics;
    use sccpath_core::scc::SccDecomposition;
    use std::collections::HashSet;

    fn component_count(n: usize, edges: Vec<EdgeRecord>) -> usize {
        let graph = document(n, edges).to_graph().unwrap();
        SccDecomposition::compute(&graph, &mut Metrics::new())
            .unwrap()
            .component_count()
    }

    fn weights_in_range(edges: &[EdgeRecord]) -> bool {
        edges.iter().all(|e| (MIN_WEIGHT..=MAX_WEIGHT).contains(&e.w))
    }

    #[test]
    fn same_seed_same_suite() {
        assert_eq!(standard_suite(7), standard_suite(7));
        assert_ne!(standard_suite(7), standard_suite(8));
    }

    #[test]
    fn dag_edges_point_forward_and_respect_cap() {
        let edges = DatasetGenerator::new(DEFAULT_SEED).dag(20, 0.3);
        assert!(edges.iter().all(|e| e.u < e.v));
        assert!(edges.len() <= 57);
        assert!(weights_in_range(&edges));
        assert_eq!(component_count(20, edges), 20);
    }

    #[test]
    fn single_cycle_has_one_ring_and_a_tail() {
        let edges = DatasetGenerator::new(DEFAULT_SEED).single_cycle(8, 3);
        assert_eq!(edges.len(), 3 + 5);
        assert_eq!((edges[2].u, edges[2].v), (2, 0));
        assert_eq!((edges[3].u, edges[3].v), (2, 3));
        // Ring {0,1,2} plus five singletons.
        assert_eq!(component_count(8, edges), 6);
    }

    #[test]
    fn multiple_sccs_leave_the_remainder_isolated() {
        let edges = DatasetGenerator::new(DEFAULT_SEED).multiple_sccs(7, 2);
        // Two rings of three, one bridge.
        assert_eq!(edges.len(), 3 + 3 + 1);
        assert_eq!((edges[6].u, edges[6].v), (0, 3));
        assert_eq!(component_count(7, edges), 3);

        let edges = DatasetGenerator::new(DEFAULT_SEED).multiple_sccs(30, 5);
        assert_eq!(component_count(30, edges), 5);
    }

    #[test]
    fn multiple_sccs_with_zero_blocks_is_empty() {
        assert!(DatasetGenerator::new(DEFAULT_SEED).multiple_sccs(5, 0).is_empty());
    }

    #[test]
    fn dense_has_no_loops_or_duplicates() {
        let edges = DatasetGenerator::new(DEFAULT_SEED).dense(18, 0.2);
        assert!(edges.iter().all(|e| e.u != e.v));
        let pairs: HashSet<(usize, usize)> = edges.iter().map(|e| (e.u, e.v)).collect();
        assert_eq!(pairs.len(), edges.len());
        assert!(weights_in_range(&edges));
    }

    #[test]
    fn sparse_keeps_the_spine() {
        let edges = DatasetGenerator::new(DEFAULT_SEED).sparse(12);
        assert!(edges.len() >= 11 && edges.len() <= 11 + 6);
        for (i, e) in edges.iter().take(11).enumerate() {
            assert_eq!((e.u, e.v), (i, i + 1));
        }
        assert!(edges.iter().all(|e| e.u != e.v));
    }

    #[test]
    fn suite_documents_are_valid() {
        let suite = standard_suite(DEFAULT_SEED);
        assert_eq!(suite.len(), 9);
        for dataset in &suite {
            dataset.document.validate().unwrap();
            assert_eq!(dataset.document.source, 0);
            assert_eq!(dataset.document.weight_model, "edge");
        }
    }

    #[test]
    fn write_suite_creates_parseable_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("data");
        let written = write_suite(&out, DEFAULT_SEED).unwrap();

        assert_eq!(written.len(), 9);
        assert_eq!(written[0], out.join("small_1.json"));
        let suite = standard_suite(DEFAULT_SEED);
        for (path, dataset) in written.iter().zip(&suite) {
            let doc = GraphDocument::load(path).unwrap();
            assert_eq!(doc, dataset.document);
        }
    }
}
