//! Plain-text edge list parsing.
//!
//! # Format
//!
//! One edge per line, `<from> <to>`, separated by any whitespace:
//!
//! ```text
//! # service dependencies
//! api   db
//! api   cache
//! cache db
//! ```
//!
//! Blank lines and lines starting with the comment prefix are ignored.
//! Lines that do not have exactly two tokens are skipped and logged; they
//! never abort the parse. Labels are interned in first-seen order.

use lowlink_core::{Graph, GraphError, LabelMap, Vertex};
use serde::Serialize;
use tracing::{debug, warn};

/// A line that was not an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    /// Number of whitespace-separated tokens found.
    pub tokens: usize,
}

/// Result of parsing an edge list.
#[derive(Debug, Clone, Default)]
pub struct EdgeList {
    pub labels: LabelMap,
    pub edges: Vec<(Vertex, Vertex)>,
    pub skipped: Vec<SkippedLine>,
}

impl EdgeList {
    /// Build the dense-index graph for the parsed edges.
    ///
    /// # Errors
    ///
    /// Only fails if the label map and edges disagree, which the parser
    /// never produces.
    pub fn to_graph(&self) -> Result<Graph, GraphError> {
        Graph::from_edges(self.labels.len(), &self.edges)
    }
}

/// Parse `text` as an edge list.
#[must_use]
pub fn parse_edge_list(text: &str, comment_prefix: &str) -> EdgeList {
    let mut list = EdgeList::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || (!comment_prefix.is_empty() && line.starts_with(comment_prefix)) {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [from, to] = tokens.as_slice() else {
            warn!(line = idx + 1, tokens = tokens.len(), "skipping malformed edge line");
            list.skipped.push(SkippedLine {
                line: idx + 1,
                tokens: tokens.len(),
            });
            continue;
        };

        let u = list.labels.intern(from);
        let v = list.labels.intern(to);
        list.edges.push((u, v));
    }

    debug!(
        vertices = list.labels.len(),
        edges = list.edges.len(),
        skipped = list.skipped.len(),
        "edge list parsed"
    );
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letter_pairs() {
        let list = parse_edge_list("A B\nB C\nC A\n", "#");
        assert_eq!(list.labels.labels(), &["A", "B", "C"]);
        assert_eq!(list.edges, vec![(0, 1), (1, 2), (2, 0)]);
        assert!(list.skipped.is_empty());
    }

    #[test]
    fn multi_character_labels_are_kept_whole() {
        let list = parse_edge_list("api db\napi cache\n", "#");
        assert_eq!(list.labels.labels(), &["api", "db", "cache"]);
        assert_eq!(list.edges, vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        let list = parse_edge_list("# header\n\n   \nA B\n  # indented\n", "#");
        assert_eq!(list.edges.len(), 1);
        assert!(list.skipped.is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped_with_line_numbers() {
        let list = parse_edge_list("A B\nlonely\nA B C\nB C\n", "#");
        assert_eq!(list.edges, vec![(0, 1), (1, 2)]);
        assert_eq!(
            list.skipped,
            vec![
                SkippedLine { line: 2, tokens: 1 },
                SkippedLine { line: 3, tokens: 3 },
            ]
        );
    }

    #[test]
    fn tabs_and_crlf_are_tolerated() {
        let list = parse_edge_list("A\tB\r\nB   C\r\n", "#");
        assert_eq!(list.edges, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn empty_comment_prefix_disables_comments() {
        let list = parse_edge_list("# B\n", "");
        assert_eq!(list.labels.labels(), &["#", "B"]);
    }

    #[test]
    fn graph_has_one_vertex_per_label() {
        let list = parse_edge_list("A B\nA B\nC C\n", "#");
        let graph = list.to_graph().expect("graph");
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.has_self_loop(2));
    }
}
