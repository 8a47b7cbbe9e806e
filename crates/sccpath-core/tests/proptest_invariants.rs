use std::collections::BTreeSet;

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use proptest::prelude::*;

use sccpath_core::dagsp::Distance;
use sccpath_core::graph::Graph;
use sccpath_core::metrics::Metrics;
use sccpath_core::pipeline::Analysis;
use sccpath_core::scc::SccDecomposition;
use sccpath_core::topo::topological_order;

type EdgeList = Vec<(usize, usize, i32)>;

/// Vertex count, edge list (self loops and parallel edges allowed) and a source.
fn arb_graph() -> impl Strategy<Value = (usize, EdgeList, usize)> {
    (1usize..40).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, -20i32..=20), 0..(n * 3)),
            0..n,
        )
    })
}

fn build(n: usize, edges: &[(usize, usize, i32)]) -> Graph {
    let mut g = Graph::new(n);
    for &(u, v, w) in edges {
        g.add_edge(u, v, w).unwrap();
    }
    g
}

fn as_sets(components: impl IntoIterator<Item = Vec<usize>>) -> BTreeSet<BTreeSet<usize>> {
    components
        .into_iter()
        .map(|c| c.into_iter().collect())
        .collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn components_partition_the_vertices((n, edges, _) in arb_graph()) {
        let g = build(n, &edges);
        let scc = SccDecomposition::compute(&g, &mut Metrics::new()).unwrap();

        let mut seen = vec![false; n];
        for (id, members) in scc.components().iter().enumerate() {
            prop_assert!(!members.is_empty());
            for &v in members {
                prop_assert!(!seen[v], "vertex {} in two components", v);
                seen[v] = true;
                prop_assert_eq!(scc.component_of(v), Some(id));
            }
        }
        prop_assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn components_match_petgraph((n, edges, _) in arb_graph()) {
        let g = build(n, &edges);
        let scc = SccDecomposition::compute(&g, &mut Metrics::new()).unwrap();

        let mut oracle = DiGraph::<(), ()>::with_capacity(n, edges.len());
        for _ in 0..n {
            oracle.add_node(());
        }
        for &(u, v, _) in &edges {
            oracle.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
        }
        let expected = kosaraju_scc(&oracle)
            .into_iter()
            .map(|c| c.into_iter().map(NodeIndex::index).collect::<Vec<_>>());

        prop_assert_eq!(as_sets(scc.components().to_vec()), as_sets(expected));
    }

    #[test]
    fn condensation_is_acyclic_and_order_respects_edges((n, edges, _) in arb_graph()) {
        let g = build(n, &edges);
        let scc = SccDecomposition::compute(&g, &mut Metrics::new()).unwrap();
        let condensation = scc.condensation();

        let order = topological_order(condensation, &mut Metrics::new()).unwrap();
        prop_assert_eq!(order.len(), condensation.vertex_count());

        let mut position = vec![0; order.len()];
        for (i, &c) in order.iter().enumerate() {
            position[c] = i;
        }
        for (u, edge) in condensation.iter_edges() {
            prop_assert!(u != edge.to, "condensation has a self loop at {}", u);
            prop_assert!(position[u] < position[edge.to]);
            prop_assert!(edge.is_aggregated());
        }
    }

    #[test]
    fn shortest_never_exceeds_longest((n, edges, source) in arb_graph()) {
        let g = build(n, &edges);
        let analysis = Analysis::run(&g, source, &mut Metrics::new()).unwrap();

        for c in 0..analysis.scc.component_count() {
            let shortest = analysis.shortest.distance(c);
            let longest = analysis.longest.distance(c);
            prop_assert_eq!(shortest.is_reachable(), longest.is_reachable());
            if let (Distance::Reachable(s), Distance::Reachable(l)) = (shortest, longest) {
                prop_assert!(s <= l, "component {}: {} > {}", c, s, l);
            }
        }
    }

    #[test]
    fn reconstructed_paths_follow_condensation_edges((n, edges, source) in arb_graph()) {
        let g = build(n, &edges);
        let analysis = Analysis::run(&g, source, &mut Metrics::new()).unwrap();
        let condensation = analysis.scc.condensation();

        for result in [&analysis.shortest, &analysis.longest] {
            for target in 0..condensation.vertex_count() {
                let path = result.reconstruct_path(target);
                if !result.distance(target).is_reachable() {
                    prop_assert!(path.is_empty());
                    continue;
                }
                prop_assert_eq!(path.first().copied(), Some(analysis.source_component));
                prop_assert_eq!(path.last().copied(), Some(target));
                for pair in path.windows(2) {
                    prop_assert!(condensation.edges(pair[0]).iter().any(|e| e.to == pair[1]));
                }
            }
        }
    }

    #[test]
    fn repeated_runs_are_identical((n, edges, source) in arb_graph()) {
        let g = build(n, &edges);
        let first = Analysis::run(&g, source, &mut Metrics::new()).unwrap();
        let second = Analysis::run(&g, source, &mut Metrics::new()).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(g.content_hash(), build(n, &edges).content_hash());
    }
}
