//! Bridge (cut-edge) detection with DFS low-links.
//!
//! # Definition
//!
//! Bridges are an undirected notion: an edge whose removal disconnects its
//! endpoints. A [`Graph`] stores directed edges, so the caller picks how the
//! search walks them with [`BridgeView`]:
//!
//! - [`BridgeView::Underlying`] walks every stored edge in both directions,
//!   i.e. the underlying undirected multigraph. This is exact.
//! - [`BridgeView::Directed`] walks only the stored direction. It is exact
//!   when the input already lists each undirected edge both ways, and an
//!   approximation for genuinely one-directional edges.
//!
//! # Parallel Edges
//!
//! The search skips the tree edge back to a vertex's parent by *edge
//! identity*, not by endpoint. A second copy of the same connection is a
//! distinct [`EdgeId`] and therefore counts as a back edge, so neither copy
//! is ever reported as a bridge.
//!
//! Under [`BridgeView::Directed`] the child may never walk back across the
//! second copy (it has no out-edge towards the parent), so a tree edge whose
//! endpoints are joined by another stored edge, in either direction, is
//! never reported either.
//!
//! # Output
//!
//! Bridges are returned in the stored orientation of the edge, ordered by
//! the discovery time of the tree edge's child endpoint.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::graph::{Edge, EdgeId, Graph, Vertex};

/// How the bridge search interprets stored edge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeView {
    /// Walk each edge both ways (underlying undirected multigraph).
    #[default]
    Underlying,
    /// Walk edges only in their stored direction.
    Directed,
}

impl BridgeView {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Underlying => "underlying",
            Self::Directed => "directed",
        }
    }
}

impl fmt::Display for BridgeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BridgeView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "underlying" | "undirected" => Ok(Self::Underlying),
            "directed" => Ok(Self::Directed),
            other => Err(format!(
                "unknown bridge view '{other}' (expected 'underlying' or 'directed')"
            )),
        }
    }
}

/// Find the bridges of the underlying undirected multigraph of `graph`.
#[must_use]
pub fn find_bridges(graph: &Graph) -> Vec<Edge> {
    find_bridges_with(graph, BridgeView::Underlying)
}

/// Find bridges under an explicit [`BridgeView`].
#[must_use]
pub fn find_bridges_with(graph: &Graph, view: BridgeView) -> Vec<Edge> {
    bridge_ids(graph, view)
        .into_iter()
        .filter_map(|id| graph.edge(id))
        .collect()
}

/// Find bridges and return their edge IDs.
///
/// Useful when parallel edges must be told apart in the result.
#[must_use]
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn bridge_ids(graph: &Graph, view: BridgeView) -> Vec<EdgeId> {
    let mut search = BridgeSearch::new(graph, view);
    for root in graph.vertices() {
        if search.discovery[root].is_none() {
            search.run_from(root);
        }
    }

    let mut found = search.found;
    found.sort_unstable_by_key(|&(child_discovery, _)| child_discovery);
    let bridges: Vec<EdgeId> = found.into_iter().map(|(_, id)| id).collect();
    debug!(bridges = bridges.len(), %view, "bridge search finished");
    bridges
}

/// One suspended vertex on the explicit DFS stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: Vertex,
    /// Tree edge used to reach this vertex; `None` for a DFS root.
    via: Option<EdgeId>,
    /// Position of the next incident edge to scan.
    cursor: usize,
}

/// Traversal state owned by a single [`bridge_ids`] call.
struct BridgeSearch<'a> {
    graph: &'a Graph,
    view: BridgeView,
    /// Discovery time; `None` means unvisited.
    discovery: Vec<Option<usize>>,
    low_link: Vec<usize>,
    time: usize,
    frames: Vec<Frame>,
    /// `(child discovery time, tree edge)` for every bridge found.
    found: Vec<(usize, EdgeId)>,
    /// Unordered endpoint pairs joined by more than one stored edge.
    multi_pairs: HashSet<(Vertex, Vertex)>,
}

impl<'a> BridgeSearch<'a> {
    fn new(graph: &'a Graph, view: BridgeView) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            view,
            discovery: vec![None; n],
            low_link: vec![0; n],
            time: 0,
            frames: Vec::new(),
            found: Vec::new(),
            multi_pairs: multi_pairs(graph),
        }
    }

    /// The `i`-th edge incident to `v` under the current view.
    fn incident(&self, v: Vertex, i: usize) -> Option<EdgeId> {
        let out = self.graph.out_edges(v);
        match self.view {
            BridgeView::Directed => out.get(i).copied(),
            BridgeView::Underlying => out
                .get(i)
                .or_else(|| self.graph.in_edges(v).get(i - out.len()))
                .copied(),
        }
    }

    fn discover(&mut self, v: Vertex, via: Option<EdgeId>) {
        self.discovery[v] = Some(self.time);
        self.low_link[v] = self.time;
        self.time += 1;
        self.frames.push(Frame {
            vertex: v,
            via,
            cursor: 0,
        });
    }

    fn run_from(&mut self, root: Vertex) {
        let graph = self.graph;
        let edges = graph.edge_list();
        self.discover(root, None);

        while let Some(&frame) = self.frames.last() {
            let v = frame.vertex;

            if let Some(id) = self.incident(v, frame.cursor) {
                if let Some(top) = self.frames.last_mut() {
                    top.cursor += 1;
                }
                if frame.via == Some(id) {
                    continue;
                }
                let w = edges[id.index()].opposite(v);
                match self.discovery[w] {
                    None => self.discover(w, Some(id)),
                    Some(dw) => self.low_link[v] = self.low_link[v].min(dw),
                }
                continue;
            }

            self.frames.pop();
            let (Some(parent), Some(via)) = (self.frames.last(), frame.via) else {
                continue;
            };
            let p = parent.vertex;
            self.low_link[p] = self.low_link[p].min(self.low_link[v]);
            if self.discovery[p].is_some_and(|dp| self.low_link[v] > dp)
                && !self.multi_pairs.contains(&unordered(p, v))
            {
                let child_discovery = self.discovery[v].unwrap_or_default();
                self.found.push((child_discovery, via));
            }
        }
    }
}

const fn unordered(u: Vertex, v: Vertex) -> (Vertex, Vertex) {
    if u <= v { (u, v) } else { (v, u) }
}

/// Endpoint pairs (ignoring direction) that carry two or more edges.
fn multi_pairs(graph: &Graph) -> HashSet<(Vertex, Vertex)> {
    let mut counts: HashMap<(Vertex, Vertex), usize> = HashMap::new();
    for edge in graph.edges().filter(|e| !e.is_self_loop()) {
        *counts.entry(unordered(edge.from, edge.to)).or_default() += 1;
    }
    counts
        .into_iter()
        .filter_map(|(pair, count)| (count > 1).then_some(pair))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
