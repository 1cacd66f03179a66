//! Graph construction module

use crate::error::TopologyError;
use crate::graph::TopologyGraph;

/// Builder for incrementally constructing a TopologyGraph from an edge list.
///
/// Edges are validated as they arrive; duplicate and reversed pairs are merged.
pub struct GraphBuilder {
    graph: TopologyGraph,

    /// Number of edges offered, including merged duplicates
    offered: usize,

    /// Number of offered edges that were duplicates
    duplicates: usize,
}

impl GraphBuilder {
    /// Create a new graph builder with the given node capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            graph: TopologyGraph::with_capacity(capacity),
            offered: 0,
            duplicates: 0,
        }
    }

    /// Add an undirected edge between two string IDs
    pub fn add_edge(&mut self, src_id: &str, dst_id: &str) -> Result<(), TopologyError> {
        let index = self.offered;

        if src_id.trim().is_empty() || dst_id.trim().is_empty() {
            return Err(TopologyError::EmptyNodeId { index });
        }
        if src_id == dst_id {
            return Err(TopologyError::SelfLoop {
                index,
                node: src_id.to_string(),
            });
        }

        let src_idx = self.graph.get_or_create_node(src_id);
        let dst_idx = self.graph.get_or_create_node(dst_id);
        if !self.graph.add_edge(src_idx, dst_idx) {
            self.duplicates += 1;
        }
        self.offered += 1;

        Ok(())
    }

    /// Build the graph, rejecting an empty edge list
    pub fn build(self) -> Result<TopologyGraph, TopologyError> {
        if self.offered == 0 {
            return Err(TopologyError::EmptyEdgeList);
        }
        if self.duplicates > 0 {
            log::debug!("Merged {} duplicate edges", self.duplicates);
        }
        Ok(self.graph)
    }
}

/// Build a graph from (source, target) pairs, failing fast on malformed input
pub fn build_graph<I, S>(edges: I) -> Result<TopologyGraph, TopologyError>
where
    I: IntoIterator<Item = (S, S)>,
    S: AsRef<str>,
{
    let edges = edges.into_iter();
    let mut builder = GraphBuilder::with_capacity(edges.size_hint().0);
    for (src, dst) in edges {
        builder.add_edge(src.as_ref(), dst.as_ref())?;
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_reversed_duplicates() {
        let graph = build_graph([("a", "b"), ("b", "a"), ("a", "b"), ("b", "c")]).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn empty_input_is_rejected() {
        let edges: Vec<(String, String)> = Vec::new();
        assert_eq!(build_graph(edges).unwrap_err(), TopologyError::EmptyEdgeList);
    }

    #[test]
    fn self_loop_is_rejected_with_its_position() {
        let err = build_graph([("a", "b"), ("c", "c")]).unwrap_err();
        assert_eq!(
            err,
            TopologyError::SelfLoop {
                index: 1,
                node: "c".to_string()
            }
        );
    }

    #[test]
    fn blank_identifier_is_rejected() {
        let err = build_graph([("a", " ")]).unwrap_err();
        assert_eq!(err, TopologyError::EmptyNodeId { index: 0 });
    }
}
