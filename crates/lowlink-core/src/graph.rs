//! Adjacency-list directed graph over a dense vertex index space.
//!
//! # Overview
//!
//! Vertices are the integers `0..vertex_count`. Every edge gets an
//! [`EdgeId`] in insertion order, and each vertex keeps its out-edges (and,
//! for the bridge engine, its in-edges) as ordered lists of edge IDs.
//!
//! Edges may repeat and self-loops are allowed. Nothing is de-duplicated
//! implicitly; call [`Graph::dedup_edges`] for a copy without parallel edges.
//!
//! ## Lifecycle
//!
//! A graph is built once from a finite edge list and then only read. The
//! analysis engines take `&Graph` and allocate their own traversal state,
//! so one graph can be analysed from several threads at once.
//!
//! ## Cache Invalidation
//!
//! [`Graph::content_hash`] is a BLAKE3 hash of the vertex count and the edge
//! list in insertion order. Compare it against a stored value to decide
//! whether a previous analysis can be reused.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;

use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::GraphError;

/// Dense zero-based vertex index.
pub type Vertex = usize;

/// Identity of one stored edge, assigned in insertion order.
///
/// Parallel edges between the same endpoints have distinct IDs, which is
/// what lets the bridge engine tell a second copy apart from the tree edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Position of the edge in insertion order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A directed edge `from -> to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub from: Vertex,
    pub to: Vertex,
}

impl Edge {
    #[must_use]
    pub const fn new(from: Vertex, to: Vertex) -> Self {
        Self { from, to }
    }

    /// Return `true` if both endpoints are the same vertex.
    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Given one endpoint, return the other one.
    #[must_use]
    pub const fn opposite(&self, v: Vertex) -> Vertex {
        if self.from == v { self.to } else { self.from }
    }
}

impl From<(Vertex, Vertex)> for Edge {
    fn from((from, to): (Vertex, Vertex)) -> Self {
        Self { from, to }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A directed multigraph stored as adjacency lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    edges: Vec<Edge>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
}

impl Graph {
    /// Allocate a graph with `vertex_count` vertices and no edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] if `vertex_count` is negative
    /// or does not fit in `usize`.
    pub fn new(vertex_count: i64) -> Result<Self, GraphError> {
        let n = usize::try_from(vertex_count)
            .map_err(|_| GraphError::InvalidArgument { vertex_count })?;
        Ok(Self::with_vertices(n))
    }

    /// Allocate a graph with `vertex_count` vertices and no edges.
    #[must_use]
    pub fn with_vertices(vertex_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            outgoing: vec![Vec::new(); vertex_count],
            incoming: vec![Vec::new(); vertex_count],
        }
    }

    /// Build a graph from a vertex count and a list of index pairs.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] for the first edge with an
    /// endpoint outside `[0, vertex_count)`.
    pub fn from_edges(vertex_count: usize, edges: &[(Vertex, Vertex)]) -> Result<Self, GraphError> {
        let mut graph = Self::with_vertices(vertex_count);
        for &(u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Append the edge `u -> v` and return its ID.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if either endpoint is not in
    /// `[0, vertex_count)`. The graph is left unchanged in that case.
    pub fn add_edge(&mut self, u: Vertex, v: Vertex) -> Result<EdgeId, GraphError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::new(u, v));
        self.outgoing[u].push(id);
        self.incoming[v].push(id);
        Ok(id)
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.outgoing.len()
    }

    /// Number of stored edges, parallel edges and self-loops included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Return `true` if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty()
    }

    /// Iterate the vertex indices `0..vertex_count`.
    pub fn vertices(&self) -> std::ops::Range<Vertex> {
        0..self.vertex_count()
    }

    /// Out-neighbours of `v` in insertion order.
    ///
    /// Each call returns a fresh iterator. Yields nothing for a vertex
    /// outside the graph.
    pub fn neighbors(&self, v: Vertex) -> impl Iterator<Item = Vertex> + '_ {
        self.out_edges(v).iter().map(|&id| self.edges[id.0].to)
    }

    /// IDs of the edges leaving `v`, in insertion order.
    #[must_use]
    pub fn out_edges(&self, v: Vertex) -> &[EdgeId] {
        self.outgoing.get(v).map_or(&[], Vec::as_slice)
    }

    /// IDs of the edges entering `v`, in insertion order.
    #[must_use]
    pub fn in_edges(&self, v: Vertex) -> &[EdgeId] {
        self.incoming.get(v).map_or(&[], Vec::as_slice)
    }

    /// Look up a stored edge by ID.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<Edge> {
        self.edges.get(id.0).copied()
    }

    /// All stored edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    /// All stored edges as a slice, in insertion order.
    #[must_use]
    pub fn edge_list(&self) -> &[Edge] {
        &self.edges
    }

    /// Out-degree of `v` (parallel edges counted separately).
    #[must_use]
    pub fn out_degree(&self, v: Vertex) -> usize {
        self.out_edges(v).len()
    }

    /// In-degree of `v` (parallel edges counted separately).
    #[must_use]
    pub fn in_degree(&self, v: Vertex) -> usize {
        self.in_edges(v).len()
    }

    /// Return `true` if `v` has an edge to itself.
    #[must_use]
    pub fn has_self_loop(&self, v: Vertex) -> bool {
        self.neighbors(v).any(|u| u == v)
    }

    /// Return a copy with parallel edges collapsed to their first occurrence.
    ///
    /// Edge order is otherwise preserved, so analysis results stay stable.
    #[must_use]
    #[instrument(skip(self), fields(vertices = self.vertex_count(), edges = self.edge_count()))]
    pub fn dedup_edges(&self) -> Self {
        let mut seen: HashSet<Edge> = HashSet::with_capacity(self.edges.len());
        let mut deduped = Self::with_vertices(self.vertex_count());

        for edge in &self.edges {
            if seen.insert(*edge) {
                let id = EdgeId(deduped.edges.len());
                deduped.edges.push(*edge);
                deduped.outgoing[edge.from].push(id);
                deduped.incoming[edge.to].push(id);
            }
        }

        deduped
    }

    /// BLAKE3 hash of the vertex count and the edge list, `"blake3:<hex>"`.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.vertex_count() as u64).to_le_bytes());
        for edge in &self.edges {
            hasher.update(&(edge.from as u64).to_le_bytes());
            hasher.update(&(edge.to as u64).to_le_bytes());
        }
        format!("blake3:{}", hasher.finalize())
    }

    /// Export as a petgraph `DiGraph`.
    ///
    /// Node weights are the vertex indices and edge weights the edge IDs, so
    /// `NodeIndex::new(v)` addresses vertex `v`.
    #[must_use]
    pub fn to_petgraph(&self) -> DiGraph<Vertex, EdgeId> {
        let mut graph = DiGraph::with_capacity(self.vertex_count(), self.edge_count());
        let nodes: Vec<_> = self.vertices().map(|v| graph.add_node(v)).collect();
        for (idx, edge) in self.edges.iter().enumerate() {
            graph.add_edge(nodes[edge.from], nodes[edge.to], EdgeId(idx));
        }
        graph
    }

    fn check_vertex(&self, v: Vertex) -> Result<(), GraphError> {
        if v < self.vertex_count() {
            Ok(())
        } else {
            Err(GraphError::OutOfRange {
                vertex: i64::try_from(v).unwrap_or(i64::MAX),
                vertex_count: self.vertex_count(),
            })
        }
    }
}

/// Build a graph from a signed vertex count and signed edge endpoints.
///
/// This is the checked entry point for callers whose indices come from an
/// untrusted source.
///
/// # Errors
///
/// - [`GraphError::InvalidArgument`] if `vertex_count` is negative.
/// - [`GraphError::OutOfRange`] for the first edge with an endpoint outside
///   `[0, vertex_count)`, negative endpoints included.
#[instrument(skip(edges))]
pub fn build_graph<I>(vertex_count: i64, edges: I) -> Result<Graph, GraphError>
where
    I: IntoIterator<Item = (i64, i64)>,
{
    let mut graph = Graph::new(vertex_count)?;
    for (u, v) in edges {
        let u = to_vertex(u, graph.vertex_count())?;
        let v = to_vertex(v, graph.vertex_count())?;
        graph.add_edge(u, v)?;
    }
    Ok(graph)
}

fn to_vertex(raw: i64, vertex_count: usize) -> Result<Vertex, GraphError> {
    usize::try_from(raw)
        .ok()
        .filter(|&v| v < vertex_count)
        .ok_or(GraphError::OutOfRange {
            vertex: raw,
            vertex_count,
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
