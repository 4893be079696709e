//! SCC condensation and topological ordering of components.
//!
//! # Overview
//!
//! The condensation has one node per strongly connected component and an
//! edge `i -> j` (`i != j`) whenever some original edge runs from a member
//! of `i` to a member of `j`. Parallel condensation edges are collapsed, so
//! [`Condensation::successors`] lists each target once, in first-seen order.
//!
//! For a correct SCC partition the condensation is a DAG. The topological
//! sort checks this as it goes: reaching a component that is still on the
//! current DFS path means the partition was wrong, and the sort fails with
//! [`InvariantViolation::CondensationCycle`] instead of emitting an order.
//!
//! # Ordering
//!
//! DFS post-order over the condensation, reversed. Every condensation edge
//! `i -> j` places `i` before `j`. Like the engines, the DFS keeps its own
//! explicit stack.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;

use petgraph::graph::DiGraph;
use tracing::{debug, instrument};

use crate::error::{GraphError, InvariantViolation};
use crate::graph::{Edge, Graph, Vertex};
use crate::scc::Components;

// ---------------------------------------------------------------------------
// Condensation
// ---------------------------------------------------------------------------

/// The component-level dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condensation {
    components: Components,
    successors: Vec<Vec<usize>>,
    /// `true` for components that contain at least one internal edge.
    cyclic: Vec<bool>,
    edge_count: usize,
}

impl Condensation {
    /// Build the condensation of `graph` under `components`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InternalInvariantViolation`] if the partition
    /// does not cover the graph's vertices ([`InvariantViolation::MissingMember`])
    /// or covers vertices the graph does not have
    /// ([`InvariantViolation::UnknownVertex`]).
    pub fn from_graph(graph: &Graph, components: Components) -> Result<Self, GraphError> {
        let covered = components.vertex_count();
        let vertex = graph.vertex_count();
        if covered < vertex {
            return Err(InvariantViolation::MissingMember { vertex: covered }.into());
        }
        if covered > vertex {
            return Err(InvariantViolation::UnknownVertex { vertex }.into());
        }
        Self::build(components, graph.edge_list())
    }

    /// Build the condensation from a partition and an original edge list.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::UnknownVertex`] (wrapped in
    /// [`GraphError`]) if an edge endpoint is not covered by the partition.
    #[instrument(skip_all, fields(components = components.len(), edges = edges.len()))]
    pub fn build(components: Components, edges: &[Edge]) -> Result<Self, GraphError> {
        let n = components.len();
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut cyclic = vec![false; n];
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        for edge in edges {
            let cu = owner(&components, edge.from)?;
            let cv = owner(&components, edge.to)?;
            if cu == cv {
                cyclic[cu] = true;
            } else if seen.insert((cu, cv)) {
                successors[cu].push(cv);
            }
        }

        debug!(condensation_edges = seen.len(), "condensation built");
        Ok(Self {
            components,
            successors,
            cyclic,
            edge_count: seen.len(),
        })
    }

    /// Number of condensation nodes (components).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.components.len()
    }

    /// Number of distinct condensation edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// The underlying partition.
    #[must_use]
    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Components directly reachable from `c`, each listed once.
    #[must_use]
    pub fn successors(&self, c: usize) -> &[usize] {
        self.successors.get(c).map_or(&[], Vec::as_slice)
    }

    /// Return `true` if component `c` contains a cycle: more than one
    /// member, or a single member with a self-loop.
    #[must_use]
    pub fn is_cyclic(&self, c: usize) -> bool {
        self.cyclic.get(c).copied().unwrap_or(false)
    }

    /// Number of cyclic components.
    #[must_use]
    pub fn cyclic_count(&self) -> usize {
        self.cyclic.iter().filter(|&&c| c).count()
    }

    /// Component indices in topological order.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::CondensationCycle`] (wrapped in
    /// [`GraphError`]) if the condensation is not acyclic.
    pub fn topological_order(&self) -> Result<Vec<usize>, GraphError> {
        let n = self.node_count();
        let mut marks = vec![Mark::Unvisited; n];
        let mut postorder: Vec<usize> = Vec::with_capacity(n);
        let mut frames: Vec<(usize, usize)> = Vec::new();

        for root in 0..n {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::OnPath;
            frames.push((root, 0));

            while let Some((c, cursor)) = frames.last_mut() {
                let c = *c;
                if let Some(&next) = self.successors[c].get(*cursor) {
                    *cursor += 1;
                    match marks[next] {
                        Mark::Unvisited => {
                            marks[next] = Mark::OnPath;
                            frames.push((next, 0));
                        }
                        Mark::OnPath => {
                            return Err(
                                InvariantViolation::CondensationCycle { component: next }.into()
                            );
                        }
                        Mark::Done => {}
                    }
                    continue;
                }

                frames.pop();
                marks[c] = Mark::Done;
                postorder.push(c);
            }
        }

        postorder.reverse();
        Ok(postorder)
    }

    /// Component member lists in topological order.
    ///
    /// # Errors
    ///
    /// See [`Condensation::topological_order`].
    pub fn ordered_components(&self) -> Result<Vec<Vec<Vertex>>, GraphError> {
        let order = self.topological_order()?;
        Ok(order
            .into_iter()
            .filter_map(|c| self.components.members(c).map(<[Vertex]>::to_vec))
            .collect())
    }

    /// Export as a petgraph DAG whose node weights are the member lists.
    ///
    /// Node `i` of the result is component `i`.
    #[must_use]
    pub fn to_petgraph(&self) -> DiGraph<Vec<Vertex>, ()> {
        let mut dag = DiGraph::with_capacity(self.node_count(), self.edge_count);
        let nodes: Vec<_> = self
            .components
            .iter()
            .map(|members| dag.add_node(members.to_vec()))
            .collect();
        for (c, targets) in self.successors.iter().enumerate() {
            for &t in targets {
                dag.add_edge(nodes[c], nodes[t], ());
            }
        }
        dag
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

fn owner(components: &Components, v: Vertex) -> Result<usize, GraphError> {
    components
        .component_of(v)
        .ok_or_else(|| InvariantViolation::UnknownVertex { vertex: v }.into())
}

/// Order SCC groups so that dependencies precede dependents.
///
/// `components` must partition `0..N`, where `N` is the total number of
/// members; `edges` is the original edge list.
///
/// # Errors
///
/// Returns [`GraphError::InternalInvariantViolation`] if the groups are not
/// a partition of `0..N`, an edge leaves that range, or the condensation
/// contains a cycle.
#[instrument(skip_all, fields(components = components.len(), edges = edges.len()))]
pub fn topologically_sort_components(
    components: &[Vec<Vertex>],
    edges: &[Edge],
) -> Result<Vec<Vec<Vertex>>, GraphError> {
    let vertex_count = components.iter().map(Vec::len).sum();
    let partition = Components::from_groups(components.to_vec(), vertex_count)?;
    Condensation::build(partition, edges)?.ordered_components()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scc::tarjan;

    fn edges(pairs: &[(Vertex, Vertex)]) -> Vec<Edge> {
        pairs.iter().copied().map(Edge::from).collect()
    }

    fn position(order: &[Vec<Vertex>], v: Vertex) -> usize {
        order
            .iter()
            .position(|group| group.contains(&v))
            .expect("vertex present")
    }

    #[test]
    fn chain_is_ordered_source_first() {
        let sorted =
            topologically_sort_components(&[vec![2], vec![1], vec![0]], &edges(&[(0, 1), (1, 2)]))
                .expect("acyclic");
        assert_eq!(sorted, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn cycle_group_precedes_its_dependents() {
        // {0,1} -> {2}
        let e = edges(&[(0, 1), (1, 0), (1, 2)]);
        let sorted = topologically_sort_components(&[vec![2], vec![1, 0]], &e).expect("acyclic");
        assert_eq!(sorted, vec![vec![1, 0], vec![2]]);
    }

    #[test]
    fn duplicate_condensation_edges_are_collapsed() {
        let g = Graph::from_edges(4, &[(0, 2), (1, 2), (0, 1), (1, 0), (0, 3)]).expect("graph");
        let cond = Condensation::from_graph(&g, tarjan(&g)).expect("condensation");
        let c01 = cond.components().component_of(0).expect("assigned");
        assert_eq!(cond.successors(c01).len(), 2);
        assert_eq!(cond.edge_count(), 2);
        assert!(cond.is_cyclic(c01));
        assert_eq!(cond.cyclic_count(), 1);
    }

    #[test]
    fn self_loop_marks_singleton_cyclic() {
        let g = Graph::from_edges(2, &[(0, 0), (0, 1)]).expect("graph");
        let cond = Condensation::from_graph(&g, tarjan(&g)).expect("condensation");
        let c0 = cond.components().component_of(0).expect("assigned");
        let c1 = cond.components().component_of(1).expect("assigned");
        assert!(cond.is_cyclic(c0));
        assert!(!cond.is_cyclic(c1));
    }

    #[test]
    fn wrong_partition_is_an_invariant_violation() {
        // 0 and 1 are mutually reachable but were split apart.
        let err =
            topologically_sort_components(&[vec![0], vec![1]], &edges(&[(0, 1), (1, 0)]))
                .expect_err("cycle in condensation");
        assert!(matches!(
            err,
            GraphError::InternalInvariantViolation(InvariantViolation::CondensationCycle { .. })
        ));
    }

    #[test]
    fn edge_outside_partition_is_rejected() {
        let err = topologically_sort_components(&[vec![0]], &edges(&[(0, 3)]))
            .expect_err("unknown vertex");
        assert_eq!(
            err,
            GraphError::InternalInvariantViolation(InvariantViolation::UnknownVertex { vertex: 3 })
        );
    }

    #[test]
    fn mismatched_partition_size_is_rejected() {
        let g = Graph::from_edges(3, &[(0, 1)]).expect("graph");
        let partial = Components::from_groups(vec![vec![0], vec![1]], 2).expect("partition");
        assert_eq!(
            Condensation::from_graph(&g, partial).expect_err("too few vertices"),
            GraphError::InternalInvariantViolation(InvariantViolation::MissingMember { vertex: 2 })
        );
    }

    #[test]
    fn oversized_partition_reports_unknown_vertex() {
        let g = Graph::from_edges(2, &[(0, 1)]).expect("graph");
        let oversized =
            Components::from_groups(vec![vec![0, 1], vec![2], vec![3]], 4).expect("partition");
        assert_eq!(
            Condensation::from_graph(&g, oversized).expect_err("too many vertices"),
            GraphError::InternalInvariantViolation(InvariantViolation::UnknownVertex { vertex: 2 })
        );
    }

    #[test]
    fn every_condensation_edge_points_forward() {
        let g = Graph::from_edges(
            7,
            &[
                (0, 1),
                (1, 2),
                (2, 0),
                (2, 3),
                (3, 4),
                (4, 3),
                (5, 4),
                (6, 0),
                (6, 5),
            ],
        )
        .expect("graph");
        let cond = Condensation::from_graph(&g, tarjan(&g)).expect("condensation");
        let order = cond.ordered_components().expect("acyclic");
        for edge in g.edges() {
            if !cond.components().same_component(edge.from, edge.to) {
                assert!(
                    position(&order, edge.from) < position(&order, edge.to),
                    "{edge:?} points backwards"
                );
            }
        }
    }

    #[test]
    fn petgraph_export_is_acyclic() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 0), (1, 2), (2, 3), (3, 2)]).expect("graph");
        let cond = Condensation::from_graph(&g, tarjan(&g)).expect("condensation");
        let dag = cond.to_petgraph();
        assert_eq!(dag.node_count(), 2);
        assert_eq!(dag.edge_count(), 1);
        assert!(!petgraph::algo::is_cyclic_directed(&dag));
    }

    #[test]
    fn empty_input_sorts_to_nothing() {
        let sorted = topologically_sort_components(&[], &[]).expect("empty");
        assert!(sorted.is_empty());
    }
}
