//! One-shot analysis: SCCs, bridges, and condensation order together.
//!
//! ## Pipeline
//!
//! ```text
//! Graph
//!   ├─ (optional) dedup_edges()
//!   ├─ scc::tarjan()              → Components (closing order)
//!   │     ↓ condense::Condensation::from_graph()
//!   │   Condensation              → topological_order()
//!   └─ bridge::bridge_ids()       → bridges
//!        ↓
//! Analysis { components, bridges, stats }
//! ```
//!
//! The SCC and bridge passes are independent; both read the same immutable
//! graph and own their traversal buffers.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::bridge::{BridgeView, bridge_ids};
use crate::condense::Condensation;
use crate::error::GraphError;
use crate::graph::{Edge, Graph, Vertex};
use crate::scc::tarjan;

/// Knobs for [`Analysis::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// How the bridge search walks directed edges.
    pub bridge_view: BridgeView,
    /// Collapse parallel edges before analysing.
    pub dedup_edges: bool,
    /// Emit components in topological order instead of closing order.
    pub topological: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            bridge_view: BridgeView::Underlying,
            dedup_edges: false,
            topological: true,
        }
    }
}

/// Summary counts for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Number of edges analysed (after de-duplication, if enabled).
    pub edge_count: usize,
    /// Parallel edges dropped by de-duplication.
    pub parallel_edges_removed: usize,
    /// Number of strongly connected components.
    pub component_count: usize,
    /// Components with more than one member or a self-loop.
    pub cyclic_component_count: usize,
    /// Size of the largest component.
    pub largest_component: usize,
    /// Vertices with no incident edges.
    pub isolated_vertex_count: usize,
    /// Distinct edges between components.
    pub condensation_edge_count: usize,
    /// Number of bridges found.
    pub bridge_count: usize,
    /// Content hash of the analysed graph.
    pub content_hash: String,
}

/// Result of [`Analysis::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// SCC groups, topologically ordered unless disabled in the options.
    pub components: Vec<Vec<Vertex>>,
    /// Bridges in the stored edge orientation.
    pub bridges: Vec<Edge>,
    pub stats: AnalysisStats,
}

impl Analysis {
    /// Run the SCC engine, the bridge engine, and the condensation sort.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InternalInvariantViolation`] if the condensation
    /// turns out to be cyclic. This indicates a defect and is not
    /// recoverable.
    #[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
    pub fn run(graph: &Graph, options: &AnalysisOptions) -> Result<Self, GraphError> {
        let input_edges = graph.edge_count();
        let graph: Cow<'_, Graph> = if options.dedup_edges {
            Cow::Owned(graph.dedup_edges())
        } else {
            Cow::Borrowed(graph)
        };

        let components = tarjan(&graph);
        let condensation = Condensation::from_graph(&graph, components)?;
        let ordered = if options.topological {
            condensation.ordered_components()?
        } else {
            condensation.components().groups().to_vec()
        };

        let bridges: Vec<Edge> = bridge_ids(&graph, options.bridge_view)
            .into_iter()
            .filter_map(|id| graph.edge(id))
            .collect();

        let stats = AnalysisStats {
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
            parallel_edges_removed: input_edges - graph.edge_count(),
            component_count: condensation.node_count(),
            cyclic_component_count: condensation.cyclic_count(),
            largest_component: ordered.iter().map(Vec::len).max().unwrap_or(0),
            isolated_vertex_count: graph
                .vertices()
                .filter(|&v| graph.out_degree(v) == 0 && graph.in_degree(v) == 0)
                .count(),
            condensation_edge_count: condensation.edge_count(),
            bridge_count: bridges.len(),
            content_hash: graph.content_hash(),
        };

        debug!(
            components = stats.component_count,
            cyclic = stats.cyclic_component_count,
            bridges = stats.bridge_count,
            "analysis complete"
        );

        Ok(Self {
            components: ordered,
            bridges,
            stats,
        })
    }
}
