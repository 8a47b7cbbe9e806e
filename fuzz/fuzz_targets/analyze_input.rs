#![no_main]

use libfuzzer_sys::fuzz_target;
use sccpath_core::input::GraphDocument;
use sccpath_core::metrics::Metrics;
use sccpath_core::pipeline::Analysis;

/// Vertex cap so oversized `n` values don't just measure allocation.
const MAX_VERTICES: usize = 4096;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(doc) = GraphDocument::from_json_str(text) else {
        return;
    };
    if doc.n > MAX_VERTICES {
        return;
    }
    let Ok(graph) = doc.to_graph() else {
        return;
    };

    let mut metrics = Metrics::new();
    let analysis = Analysis::run(&graph, doc.source, &mut metrics)
        .expect("validated documents always analyze");

    let partitioned: usize = analysis.scc.components().iter().map(Vec::len).sum();
    assert_eq!(partitioned, doc.n);
    assert_eq!(analysis.order.len(), analysis.scc.component_count());
});
