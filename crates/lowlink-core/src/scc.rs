//! Strongly connected components via Tarjan's algorithm.
//!
//! # Algorithm
//!
//! One depth-first search over the whole graph, restarted from every
//! unvisited vertex in index order. Each vertex gets a discovery index and a
//! low-link value on first visit and is pushed onto the component stack.
//! Out-edges are scanned in adjacency order:
//!
//! - unvisited target: descend, then fold the child's low-link into ours;
//! - target still on the component stack: fold its discovery index in;
//! - target already in a closed component: ignore.
//!
//! When a vertex finishes with `low_link == index` it roots a component and
//! the stack is popped down to it. Components are emitted in closing order,
//! which is a reverse topological order of the condensation.
//!
//! # Stack Depth
//!
//! The descent uses an explicit stack of `(vertex, edge cursor)` frames, so
//! a path of a million vertices needs a million small frames on the heap
//! rather than a million native call frames.
//!
//! Work is `O(V + E)`: every vertex is discovered once and every edge is
//! scanned once.

#![allow(clippy::module_name_repetitions)]

use tracing::{debug, instrument, trace};

use crate::error::{GraphError, InvariantViolation};
use crate::graph::{Graph, Vertex};

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// A partition of the vertex set into strongly connected components.
///
/// Group order is the order in which the components were closed during the
/// search. Within a group, members are in stack-pop order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    groups: Vec<Vec<Vertex>>,
    component_of: Vec<usize>,
}

impl Components {
    /// Validate an externally supplied partition of `0..vertex_count`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InternalInvariantViolation`] if a member is
    /// outside `0..vertex_count`, appears twice, or if some vertex is not
    /// covered by any group.
    pub fn from_groups(groups: Vec<Vec<Vertex>>, vertex_count: usize) -> Result<Self, GraphError> {
        let mut component_of: Vec<Option<usize>> = vec![None; vertex_count];

        for (c, group) in groups.iter().enumerate() {
            for &v in group {
                let slot = component_of
                    .get_mut(v)
                    .ok_or(InvariantViolation::UnknownVertex { vertex: v })?;
                if slot.replace(c).is_some() {
                    return Err(InvariantViolation::DuplicateMember { vertex: v }.into());
                }
            }
        }

        let component_of = component_of
            .into_iter()
            .enumerate()
            .map(|(v, c)| c.ok_or(InvariantViolation::MissingMember { vertex: v }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            groups,
            component_of,
        })
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Return `true` if there are no components (the graph was empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of vertices covered by the partition.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.component_of.len()
    }

    /// All groups in closing order.
    #[must_use]
    pub fn groups(&self) -> &[Vec<Vertex>] {
        &self.groups
    }

    /// Members of component `c`.
    #[must_use]
    pub fn members(&self, c: usize) -> Option<&[Vertex]> {
        self.groups.get(c).map(Vec::as_slice)
    }

    /// Index of the component that owns vertex `v`.
    #[must_use]
    pub fn component_of(&self, v: Vertex) -> Option<usize> {
        self.component_of.get(v).copied()
    }

    /// Vertex to component map, indexed by vertex.
    #[must_use]
    pub fn assignment(&self) -> &[usize] {
        &self.component_of
    }

    /// Iterate the groups in closing order.
    pub fn iter(&self) -> impl Iterator<Item = &[Vertex]> {
        self.groups.iter().map(Vec::as_slice)
    }

    /// Return `true` if `u` and `v` belong to the same component.
    #[must_use]
    pub fn same_component(&self, u: Vertex, v: Vertex) -> bool {
        matches!(
            (self.component_of(u), self.component_of(v)),
            (Some(a), Some(b)) if a == b
        )
    }

    /// Components of `graph` that contain a cycle: more than one member, or
    /// a single member with a self-loop.
    #[must_use]
    pub fn cyclic(&self, graph: &Graph) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, group)| match group.as_slice() {
                [v] => graph.has_self_loop(*v),
                members => members.len() > 1,
            })
            .map(|(c, _)| c)
            .collect()
    }

    /// Consume the partition and return the raw groups.
    #[must_use]
    pub fn into_groups(self) -> Vec<Vec<Vertex>> {
        self.groups
    }
}

// ---------------------------------------------------------------------------
// Tarjan search
// ---------------------------------------------------------------------------

/// Compute the strongly connected components of `graph`.
///
/// Every vertex lands in exactly one group. The result only depends on the
/// graph's adjacency order, so repeated calls return identical partitions.
#[must_use]
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn tarjan(graph: &Graph) -> Components {
    let mut search = TarjanSearch::new(graph);
    for root in graph.vertices() {
        if search.index[root].is_none() {
            search.run_from(root);
        }
    }

    let components = Components {
        groups: search.groups,
        component_of: search.component_of,
    };
    debug!(components = components.len(), "tarjan search finished");
    components
}

/// Compute the strongly connected components of `graph` as plain groups.
///
/// Convenience wrapper over [`tarjan`].
#[must_use]
pub fn find_strongly_connected_components(graph: &Graph) -> Vec<Vec<Vertex>> {
    tarjan(graph).into_groups()
}

/// One suspended vertex on the explicit DFS stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: Vertex,
    /// Position of the next out-edge to scan.
    cursor: usize,
}

/// Traversal state owned by a single [`tarjan`] call.
struct TarjanSearch<'a> {
    graph: &'a Graph,
    /// Discovery index; `None` means unvisited.
    index: Vec<Option<usize>>,
    low_link: Vec<usize>,
    on_stack: Vec<bool>,
    next_index: usize,
    stack: Vec<Vertex>,
    frames: Vec<Frame>,
    groups: Vec<Vec<Vertex>>,
    component_of: Vec<usize>,
}

impl<'a> TarjanSearch<'a> {
    fn new(graph: &'a Graph) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            index: vec![None; n],
            low_link: vec![0; n],
            on_stack: vec![false; n],
            next_index: 0,
            stack: Vec::new(),
            frames: Vec::new(),
            groups: Vec::new(),
            component_of: vec![usize::MAX; n],
        }
    }

    fn discover(&mut self, v: Vertex) {
        self.index[v] = Some(self.next_index);
        self.low_link[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        self.frames.push(Frame { vertex: v, cursor: 0 });
    }

    fn run_from(&mut self, root: Vertex) {
        let graph = self.graph;
        let edges = graph.edge_list();
        self.discover(root);

        while let Some(frame) = self.frames.last_mut() {
            let v = frame.vertex;

            if let Some(&id) = graph.out_edges(v).get(frame.cursor) {
                frame.cursor += 1;
                let w = edges[id.index()].to;
                match self.index[w] {
                    None => self.discover(w),
                    Some(w_index) if self.on_stack[w] => {
                        self.low_link[v] = self.low_link[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            // All out-edges scanned: finish `v` the way a returning call would.
            self.frames.pop();
            if Some(self.low_link[v]) == self.index[v] {
                self.close_component(v);
            }
            if let Some(parent) = self.frames.last() {
                let p = parent.vertex;
                self.low_link[p] = self.low_link[p].min(self.low_link[v]);
            }
        }
    }

    fn close_component(&mut self, root: Vertex) {
        let c = self.groups.len();
        let mut group = Vec::new();

        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            self.component_of[w] = c;
            group.push(w);
            if w == root {
                break;
            }
        }

        trace!(component = c, size = group.len(), root, "component closed");
        self.groups.push(group);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
