//! Greedy edge insertion favouring well-connected endpoint pairs

use std::collections::HashSet;

use itertools::Itertools;

use crate::graph::{EdgeKey, TopologyGraph};

/// Result of one insertion batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdditionOutcome {
    pub requested: usize,
    pub added: usize,
}

impl AdditionOutcome {
    /// How many requested edges could not be placed
    pub fn shortfall(&self) -> usize {
        self.requested - self.added
    }
}

/// A missing edge and its preferential-attachment score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredPair {
    pub pair: EdgeKey,
    pub score: usize,
}

/// Every absent node pair in enumeration order, scored by the sum of the
/// endpoints' current degrees
pub fn scored_candidates(graph: &TopologyGraph) -> Vec<ScoredPair> {
    let degrees = graph.degrees();
    let existing: HashSet<EdgeKey> = graph.edges().into_iter().collect();

    (0..graph.node_count() as u32)
        .tuple_combinations()
        .filter(|pair| !existing.contains(pair))
        .map(|(u, v)| ScoredPair {
            pair: (u, v),
            score: degrees[u as usize] + degrees[v as usize],
        })
        .collect()
}

/// Add up to `count` new edges, highest score first.
///
/// Scores are taken once before the first insertion. Ties keep enumeration
/// order. A complete graph has no candidates and receives nothing.
pub fn add_edges(graph: &mut TopologyGraph, count: usize) -> AdditionOutcome {
    let mut outcome = AdditionOutcome {
        requested: count,
        added: 0,
    };
    if count == 0 {
        return outcome;
    }

    let mut candidates = scored_candidates(graph);
    // Stable sort: equal scores stay in enumeration order
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    for candidate in candidates.iter().take(count) {
        let (u, v) = candidate.pair;
        if graph.add_edge(u, v) {
            log::debug!(
                "Added edge ({}, {}) with score {}",
                graph.node_id(u),
                graph.node_id(v),
                candidate.score
            );
            outcome.added += 1;
        }
    }

    if outcome.shortfall() > 0 {
        log::warn!(
            "Only {} of {} requested edges could be added: candidate pairs exhausted",
            outcome.added,
            outcome.requested
        );
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;

    #[test]
    fn square_gains_both_diagonals() {
        let mut graph = build_graph([("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")]).unwrap();
        let outcome = add_edges(&mut graph, 2);

        assert_eq!(outcome, AdditionOutcome { requested: 2, added: 2 });
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.has_edge(0, 2));
        assert!(graph.has_edge(1, 3));
    }

    #[test]
    fn prefers_hub_pairs_and_breaks_ties_by_enumeration() {
        // Two stars sharing no leaves: hubs h1 and h2 have degree 2
        let mut graph =
            build_graph([("h1", "a"), ("h1", "b"), ("h2", "c"), ("h2", "d")]).unwrap();
        let h1 = graph.index_of("h1").unwrap();
        let h2 = graph.index_of("h2").unwrap();

        add_edges(&mut graph, 1);
        assert!(graph.has_edge(h1, h2));

        // Next best score is 4 (hub + leaf), first in enumeration: h1 with c
        let c = graph.index_of("c").unwrap();
        add_edges(&mut graph, 1);
        assert!(graph.has_edge(h1, c));
    }

    #[test]
    fn complete_graph_has_no_headroom() {
        let mut graph = build_graph([("a", "b"), ("b", "c"), ("c", "a")]).unwrap();
        assert!(scored_candidates(&graph).is_empty());

        let outcome = add_edges(&mut graph, 5);
        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.shortfall(), 5);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn partial_headroom_is_reported() {
        let mut graph = build_graph([("a", "b"), ("b", "c")]).unwrap();
        let outcome = add_edges(&mut graph, 4);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.shortfall(), 3);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn zero_count_is_a_no_op() {
        let mut graph = build_graph([("a", "b"), ("c", "d")]).unwrap();
        let outcome = add_edges(&mut graph, 0);
        assert_eq!(outcome.added, 0);
        assert_eq!(graph.edge_count(), 2);
    }
}
