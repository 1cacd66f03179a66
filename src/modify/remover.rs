//! Greedy edge deletion favouring low-betweenness edges without splitting the graph

use std::collections::HashMap;

use crate::graph::algorithms::{Connectivity, UnionFindConnectivity};
use crate::graph::{EdgeKey, TopologyGraph};
use crate::modify::betweenness_or_default;

/// Result of one deletion batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalOutcome {
    pub requested: usize,
    pub removed: usize,

    /// Candidates put back because the graph would not stay connected
    pub rejected: usize,
}

impl RemovalOutcome {
    /// How many requested removals could not be committed
    pub fn shortfall(&self) -> usize {
        self.requested - self.removed
    }
}

/// Existing edges ordered for removal: ascending betweenness, ties in
/// enumeration order. Edges missing from `betweenness` score 0.0.
pub fn removal_order(graph: &TopologyGraph, betweenness: &HashMap<EdgeKey, f64>) -> Vec<EdgeKey> {
    let mut scored: Vec<(EdgeKey, f64)> = graph
        .edges()
        .into_iter()
        .map(|key| (key, betweenness.get(&key).copied().unwrap_or(0.0)))
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.into_iter().map(|(key, _)| key).collect()
}

/// Remove up to `count` edges, keeping the graph connected
pub fn remove_edges(graph: &mut TopologyGraph, count: usize) -> RemovalOutcome {
    remove_edges_with(graph, count, &UnionFindConnectivity)
}

/// Remove up to `count` edges using the given connectivity check.
///
/// Betweenness is computed once for the whole batch. Each candidate is taken
/// out tentatively and restored in place if the graph is no longer connected,
/// so a graph that starts disconnected loses no edges.
pub fn remove_edges_with<C: Connectivity>(
    graph: &mut TopologyGraph,
    count: usize,
    connectivity: &C,
) -> RemovalOutcome {
    if count == 0 {
        return RemovalOutcome {
            requested: 0,
            removed: 0,
            rejected: 0,
        };
    }

    let betweenness = betweenness_or_default(graph);
    let order = removal_order(graph, &betweenness);
    remove_in_order(graph, order, count, connectivity)
}

/// Try candidates in `order` until `count` removals are committed
fn remove_in_order<C: Connectivity>(
    graph: &mut TopologyGraph,
    order: Vec<EdgeKey>,
    count: usize,
    connectivity: &C,
) -> RemovalOutcome {
    let mut outcome = RemovalOutcome {
        requested: count,
        removed: 0,
        rejected: 0,
    };

    for (u, v) in order {
        if outcome.removed >= count {
            break;
        }
        let Some(slot) = graph.take_edge(u, v) else {
            continue;
        };

        if !connectivity.is_connected(graph) {
            graph.restore_edge(slot);
            outcome.rejected += 1;
            log::debug!(
                "Kept edge ({}, {}), removing it leaves the graph disconnected",
                graph.node_id(u),
                graph.node_id(v)
            );
            continue;
        }

        log::debug!("Removed edge ({}, {})", graph.node_id(u), graph.node_id(v));
        outcome.removed += 1;
    }

    if outcome.shortfall() > 0 {
        log::warn!(
            "Only {} of {} requested edges could be removed without disconnecting the graph",
            outcome.removed,
            outcome.requested
        );
    }

    outcome
}
