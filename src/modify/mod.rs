//! Topology modification: grow or shrink a graph toward a target edge count

pub mod adder;
pub mod remover;

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::config::ModifierConfig;
use crate::error::TopologyError;
use crate::graph::algorithms::edge_betweenness;
use crate::graph::{build_graph, EdgeKey, TopologyGraph};
use crate::stats::StatsSnapshot;

pub use adder::{add_edges, AdditionOutcome};
pub use remover::{remove_edges, remove_edges_with, RemovalOutcome};

/// Edge betweenness of every edge, or an empty map (every edge 0.0) when the
/// computation fails
pub fn betweenness_or_default(graph: &TopologyGraph) -> HashMap<EdgeKey, f64> {
    match edge_betweenness(graph) {
        Ok(betweenness) => betweenness,
        Err(e) => {
            log::warn!("Edge betweenness unavailable, using 0.0 for every edge: {}", e);
            HashMap::new()
        }
    }
}

/// What the mutation phase did to the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Unchanged,
    Added(AdditionOutcome),
    Removed(RemovalOutcome),
}

impl Mutation {
    /// Requested changes that could not be delivered
    pub fn shortfall(&self) -> usize {
        match self {
            Mutation::Unchanged => 0,
            Mutation::Added(outcome) => outcome.shortfall(),
            Mutation::Removed(outcome) => outcome.shortfall(),
        }
    }
}

/// An edge of the modified graph with its computed metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub source_degree: usize,
    pub target_degree: usize,
    pub edge_betweenness: f64,
}

/// Output of one modification run
#[derive(Debug, Clone)]
pub struct ModificationResult {
    /// Edges of the modified graph in canonical order
    pub edges: Vec<EdgeRecord>,
    pub original_stats: StatsSnapshot,
    pub new_stats: StatsSnapshot,
    pub target_edges: usize,
    pub mutation: Mutation,
}

impl ModificationResult {
    /// The modified edge list without metrics
    pub fn edge_pairs(&self) -> Vec<(String, String)> {
        self.edges
            .iter()
            .map(|edge| (edge.source.clone(), edge.target.clone()))
            .collect()
    }
}

/// Drives one modification run per call; each run owns its graph
#[derive(Debug, Clone, Default)]
pub struct TopologyModifier {
    config: ModifierConfig,
}

impl TopologyModifier {
    pub fn new(config: ModifierConfig) -> Self {
        Self { config }
    }

    /// Build a graph from `edges`, move it toward the target edge count and
    /// report statistics before and after
    pub fn modify<I, S>(&self, edges: I) -> Result<ModificationResult, TopologyError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        self.config.validate()?;

        let mut graph = build_graph(edges)?;
        log::info!(
            "Built graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        let original_stats = StatsSnapshot::compute(&graph)?;

        let current_edges = graph.edge_count();
        let target_edges = self.config.target_edge_count(current_edges);
        log::info!("Target edge count: {} (currently {})", target_edges, current_edges);

        let mutation = self.mutate(&mut graph, target_edges);

        let new_stats = StatsSnapshot::compute(&graph)?;
        log::info!(
            "Modified graph has {} nodes and {} edges",
            new_stats.node_count,
            new_stats.edge_count
        );

        Ok(ModificationResult {
            edges: edge_records(&graph),
            original_stats,
            new_stats,
            target_edges,
            mutation,
        })
    }

    fn mutate(&self, graph: &mut TopologyGraph, target_edges: usize) -> Mutation {
        let current_edges = graph.edge_count();
        match target_edges.cmp(&current_edges) {
            Ordering::Greater => {
                let outcome = add_edges(graph, target_edges - current_edges);
                log::info!("Added {} edges", outcome.added);
                Mutation::Added(outcome)
            }
            Ordering::Less => {
                let outcome = remove_edges(graph, current_edges - target_edges);
                log::info!("Removed {} edges", outcome.removed);
                Mutation::Removed(outcome)
            }
            Ordering::Equal => Mutation::Unchanged,
        }
    }
}

/// Per-edge degrees and betweenness over the final graph, from a single
/// centrality pass
pub fn edge_records(graph: &TopologyGraph) -> Vec<EdgeRecord> {
    edge_records_with(graph, &betweenness_or_default(graph))
}

/// Per-edge degrees with betweenness looked up in `betweenness`; edges
/// missing from the map get 0.0
pub fn edge_records_with(
    graph: &TopologyGraph,
    betweenness: &HashMap<EdgeKey, f64>,
) -> Vec<EdgeRecord> {
    let degrees = graph.degrees();

    graph
        .edges()
        .into_iter()
        .map(|(u, v)| EdgeRecord {
            source: graph.node_id(u).to_string(),
            target: graph.node_id(v).to_string(),
            source_degree: degrees[u as usize],
            target_degree: degrees[v as usize],
            edge_betweenness: betweenness.get(&(u, v)).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Convenience entry point taking the change parameters directly
pub fn modify<I, S>(
    edges: I,
    change_factor: f64,
    min_edges: Option<usize>,
    max_edges: Option<usize>,
) -> Result<ModificationResult, TopologyError>
where
    I: IntoIterator<Item = (S, S)>,
    S: AsRef<str>,
{
    TopologyModifier::new(ModifierConfig::new(change_factor, min_edges, max_edges)).modify(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: [(&str, &str); 4] = [("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")];

    #[test]
    fn unit_factor_leaves_graph_alone() {
        let result = modify(SQUARE, 1.0, None, None).unwrap();
        assert_eq!(result.mutation, Mutation::Unchanged);
        assert_eq!(result.edges.len(), 4);
        assert_eq!(result.original_stats.edge_count, result.new_stats.edge_count);
    }

    #[test]
    fn edge_records_carry_final_degrees() {
        let result = modify(SQUARE, 1.5, None, None).unwrap();
        assert_eq!(result.target_edges, 6);
        assert!(result
            .edges
            .iter()
            .all(|edge| edge.source_degree == 3 && edge.target_degree == 3));
        // K4: every edge only carries its own pair, 2 of 12 ordered pairs
        assert!(result
            .edges
            .iter()
            .all(|edge| (edge.edge_betweenness - 1.0 / 6.0).abs() < 1e-12));
    }

    #[test]
    fn invalid_factor_fails_before_building() {
        let err = modify(SQUARE, -1.0, None, None).unwrap_err();
        assert_eq!(err, TopologyError::InvalidChangeFactor(-1.0));
    }

    #[test]
    fn empty_edge_list_fails_fast() {
        let edges: Vec<(&str, &str)> = Vec::new();
        assert_eq!(modify(edges, 1.2, None, None).unwrap_err(), TopologyError::EmptyEdgeList);
    }

    #[test]
    fn single_edge_graph_has_unit_betweenness() {
        let result = modify([("x", "y")], 1.0, None, None).unwrap();
        assert_eq!(result.edge_pairs(), vec![("x".to_string(), "y".to_string())]);
        assert_eq!(result.edges[0].edge_betweenness, 1.0);
    }

    #[test]
    fn empty_graph_has_no_betweenness() {
        assert!(betweenness_or_default(&TopologyGraph::default()).is_empty());
    }

    #[test]
    fn missing_betweenness_reads_as_zero() {
        let graph = build_graph(SQUARE).unwrap();
        let records = edge_records_with(&graph, &HashMap::new());

        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|edge| edge.edge_betweenness == 0.0));
        assert!(records
            .iter()
            .all(|edge| edge.source_degree == 2 && edge.target_degree == 2));
        assert_eq!(records[0].source, "A");
        assert_eq!(records[0].target, "B");
    }
}
