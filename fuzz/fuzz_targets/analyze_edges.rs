#![no_main]

use libfuzzer_sys::fuzz_target;
use lowlink_core::{
    Analysis, AnalysisOptions, BridgeView, Components, GraphError, build_graph, tarjan,
};

// First byte: vertex count (signed, so negative counts are exercised).
// Remaining bytes: (from, to) pairs, signed, so out-of-range endpoints
// on both sides are exercised.
fuzz_target!(|data: &[u8]| {
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let vertex_count = i64::from(count as i8);
    let edges = rest
        .chunks_exact(2)
        .map(|pair| (i64::from(pair[0] as i8), i64::from(pair[1] as i8)));

    let graph = match build_graph(vertex_count, edges) {
        Ok(graph) => graph,
        Err(GraphError::InvalidArgument { .. } | GraphError::OutOfRange { .. }) => return,
        Err(err) => panic!("unexpected construction error: {err}"),
    };

    let components = tarjan(&graph);
    Components::from_groups(components.groups().to_vec(), graph.vertex_count())
        .expect("tarjan output is a partition");

    for view in [BridgeView::Underlying, BridgeView::Directed] {
        let options = AnalysisOptions {
            bridge_view: view,
            ..AnalysisOptions::default()
        };
        let analysis = Analysis::run(&graph, &options).expect("condensation is acyclic");
        assert_eq!(analysis.stats.component_count, components.len());
        for bridge in &analysis.bridges {
            assert!(!bridge.is_self_loop(), "self-loop reported as bridge");
        }
    }
});
