//! Graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod topology;

pub use builder::{build_graph, GraphBuilder};
pub use topology::{edge_key, EdgeKey, EdgeSlot, TopologyGraph};
