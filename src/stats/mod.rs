//! Descriptive statistics of a graph snapshot

pub mod report;

use itertools::Itertools;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::error::TopologyError;
use crate::graph::algorithms::{total_shortest_path_length, Connectivity, PetgraphConnectivity};
use crate::graph::TopologyGraph;

pub use report::{compare, StatComparison, StatValue};

/// Fixed set of metrics describing a graph at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub node_count: usize,
    pub edge_count: usize,
    pub avg_degree: f64,

    /// Edges over the maximum possible for the node count
    pub density: f64,

    pub is_connected: bool,

    /// Mean local clustering coefficient over all nodes
    pub avg_clustering: f64,

    /// Pearson correlation of endpoint degrees; NaN when undefined
    pub degree_assortativity: f64,

    /// Mean hop distance between node pairs; infinite when disconnected
    pub avg_shortest_path: f64,
}

impl StatsSnapshot {
    /// Compute every metric for `graph` without modifying it
    pub fn compute(graph: &TopologyGraph) -> Result<Self, TopologyError> {
        let node_count = graph.node_count();
        if node_count == 0 {
            return Err(TopologyError::EmptyGraph);
        }

        let edge_count = graph.edge_count();
        let degree_sum: usize = graph.degrees().iter().sum();
        let is_connected = PetgraphConnectivity.is_connected(graph);

        let degree_assortativity = degree_assortativity(graph);
        if degree_assortativity.is_nan() {
            log::warn!("Degree assortativity is undefined for this graph (no degree variance)");
        }

        let avg_shortest_path = if is_connected {
            average_shortest_path(graph)
        } else {
            log::warn!("Graph is disconnected; average shortest path is infinite");
            f64::INFINITY
        };

        Ok(Self {
            node_count,
            edge_count,
            avg_degree: degree_sum as f64 / node_count as f64,
            density: density(node_count, edge_count),
            is_connected,
            avg_clustering: average_clustering(graph),
            degree_assortativity,
            avg_shortest_path,
        })
    }

    /// The metrics as labelled values, in reporting order
    pub fn entries(&self) -> [(&'static str, StatValue); 8] {
        [
            ("num_nodes", StatValue::Count(self.node_count)),
            ("num_edges", StatValue::Count(self.edge_count)),
            ("avg_degree", StatValue::Real(self.avg_degree)),
            ("density", StatValue::Real(self.density)),
            ("is_connected", StatValue::Flag(self.is_connected)),
            ("avg_clustering", StatValue::Real(self.avg_clustering)),
            ("degree_assortativity", StatValue::Real(self.degree_assortativity)),
            ("avg_shortest_path", StatValue::Real(self.avg_shortest_path)),
        ]
    }
}

/// Density of a simple undirected graph
pub fn density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    let possible = node_count as f64 * (node_count - 1) as f64 / 2.0;
    edge_count as f64 / possible
}

/// Local clustering coefficient of one node; 0 below degree 2
pub fn local_clustering(graph: &TopologyGraph, node: u32) -> f64 {
    let neighbors = graph.neighbors(node);
    let k = neighbors.len();
    if k < 2 {
        return 0.0;
    }

    let links = neighbors
        .iter()
        .tuple_combinations()
        .filter(|&(&a, &b)| graph.has_edge(a, b))
        .count();

    2.0 * links as f64 / (k * (k - 1)) as f64
}

/// Mean local clustering coefficient
pub fn average_clustering(graph: &TopologyGraph) -> f64 {
    let coefficients: Vec<f64> = (0..graph.node_count() as u32)
        .map(|node| local_clustering(graph, node))
        .collect();
    coefficients.iter().mean()
}

/// Pearson correlation of degrees across both orientations of every edge
pub fn degree_assortativity(graph: &TopologyGraph) -> f64 {
    let degrees = graph.degrees();
    let mut xs = Vec::with_capacity(2 * graph.edge_count());
    let mut ys = Vec::with_capacity(2 * graph.edge_count());

    for (u, v) in graph.edges() {
        let du = degrees[u as usize] as f64;
        let dv = degrees[v as usize] as f64;
        xs.extend([du, dv]);
        ys.extend([dv, du]);
    }

    if xs.is_empty() {
        return f64::NAN;
    }

    let var_x = xs.iter().population_variance();
    let var_y = ys.iter().population_variance();
    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return f64::NAN;
    }

    xs.iter().population_covariance(ys.iter()) / (var_x * var_y).sqrt()
}

/// Mean hop distance over ordered pairs of distinct nodes.
///
/// Only meaningful for connected graphs; a single node gives 0.
pub fn average_shortest_path(graph: &TopologyGraph) -> f64 {
    let n = graph.node_count();
    if n < 2 {
        return 0.0;
    }
    total_shortest_path_length(graph) / (n as f64 * (n - 1) as f64)
}
