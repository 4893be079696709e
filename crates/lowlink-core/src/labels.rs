//! Translation between external vertex labels and the dense index space.
//!
//! The engines only understand `0..N`. Callers whose vertices are named
//! (single letters, item IDs, host names) intern each label once and
//! translate results back afterwards. Labels get indices in first-seen
//! order, so the same input always yields the same numbering.

use std::collections::HashMap;

use crate::graph::{Edge, Vertex};

/// Bidirectional label ↔ index map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    labels: Vec<String>,
    index: HashMap<String, Vertex>,
}

impl LabelMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index for `label`, assigning the next free one if new.
    pub fn intern(&mut self, label: &str) -> Vertex {
        if let Some(&v) = self.index.get(label) {
            return v;
        }
        let v = self.labels.len();
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), v);
        v
    }

    /// Index of a previously interned label.
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<Vertex> {
        self.index.get(label).copied()
    }

    /// Label of vertex `v`.
    #[must_use]
    pub fn label(&self, v: Vertex) -> Option<&str> {
        self.labels.get(v).map(String::as_str)
    }

    /// Number of interned labels (the vertex count of the index space).
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All labels in index order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Translate a vertex back to its label, falling back to `#<index>`.
    #[must_use]
    pub fn display(&self, v: Vertex) -> String {
        self.label(v)
            .map_or_else(|| format!("#{v}"), ToString::to_string)
    }

    /// Translate groups of vertices to groups of labels.
    #[must_use]
    pub fn translate_groups(&self, groups: &[Vec<Vertex>]) -> Vec<Vec<String>> {
        groups
            .iter()
            .map(|group| group.iter().map(|&v| self.display(v)).collect())
            .collect()
    }

    /// Translate edges to `[from, to]` label pairs.
    #[must_use]
    pub fn translate_edges(&self, edges: &[Edge]) -> Vec<[String; 2]> {
        edges
            .iter()
            .map(|e| [self.display(e.from), self.display(e.to)])
            .collect()
    }
}
