//! Error types for graph construction and centrality computation

use thiserror::Error;

/// Fatal errors raised while building or measuring a graph
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TopologyError {
    /// No edges were supplied
    #[error("edge list is empty")]
    EmptyEdgeList,

    /// An edge has a blank node identifier
    #[error("edge {index} has an empty node identifier")]
    EmptyNodeId { index: usize },

    /// An edge connects a node to itself
    #[error("edge {index} is a self-loop on node {node:?}")]
    SelfLoop { index: usize, node: String },

    /// The multiplicative change factor is unusable
    #[error("change factor must be a positive finite number, got {0}")]
    InvalidChangeFactor(f64),

    /// Statistics were requested for a graph without nodes
    #[error("graph has no nodes")]
    EmptyGraph,
}

/// Non-fatal failure of the edge betweenness computation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CentralityError {
    #[error("cannot compute edge betweenness on a graph with no nodes")]
    EmptyGraph,

    #[error("edge betweenness for ({from}, {to}) is not finite: {value}")]
    NonFinite { from: String, to: String, value: f64 },
}
