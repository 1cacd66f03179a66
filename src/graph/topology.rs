//! Mutable simple undirected graph keyed by string node identifiers

use std::collections::HashMap;

/// Canonical key of an undirected edge: endpoints in ascending index order
pub type EdgeKey = (u32, u32);

/// Build the canonical key for the edge between `u` and `v`
pub fn edge_key(u: u32, v: u32) -> EdgeKey {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// Adjacency positions of a removed edge, used to undo the removal exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSlot {
    u: u32,
    v: u32,
    pos_in_u: usize,
    pos_in_v: usize,
}

impl EdgeSlot {
    /// Endpoints of the removed edge
    pub fn endpoints(&self) -> EdgeKey {
        edge_key(self.u, self.v)
    }
}

/// Simple undirected graph: no self-loops, no parallel edges.
///
/// Nodes are interned in first-seen order; that index order is the
/// canonical ordering used for every enumeration.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    /// Original string IDs, indexed by node index
    node_ids: Vec<String>,

    /// Mapping from string IDs to node indices
    id_to_index: HashMap<String, u32>,

    /// Neighbour lists in insertion order
    adjacency: Vec<Vec<u32>>,

    /// Number of undirected edges
    edge_count: usize,
}

impl TopologyGraph {
    /// Create an empty graph with pre-allocated node capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            node_ids: Vec::with_capacity(node_capacity),
            id_to_index: HashMap::with_capacity(node_capacity),
            adjacency: Vec::with_capacity(node_capacity),
            edge_count: 0,
        }
    }

    /// Get or create the index for the given string ID
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.adjacency.push(Vec::new());

        idx
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// String ID of a node index
    pub fn node_id(&self, node: u32) -> &str {
        &self.node_ids[node as usize]
    }

    /// Node index of a string ID, if present
    pub fn index_of(&self, id: &str) -> Option<u32> {
        self.id_to_index.get(id).copied()
    }

    pub fn neighbors(&self, node: u32) -> &[u32] {
        &self.adjacency[node as usize]
    }

    pub fn degree(&self, node: u32) -> usize {
        self.adjacency[node as usize].len()
    }

    /// Degree of every node, recomputed from the adjacency lists
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(Vec::len).collect()
    }

    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        // Scan the shorter list
        let (a, b) = if self.degree(u) <= self.degree(v) { (u, v) } else { (v, u) };
        self.adjacency[a as usize].contains(&b)
    }

    /// Insert an undirected edge.
    ///
    /// Returns `false` without touching the graph for self-loops and for
    /// edges that already exist.
    pub fn add_edge(&mut self, u: u32, v: u32) -> bool {
        if u == v || self.has_edge(u, v) {
            return false;
        }

        self.adjacency[u as usize].push(v);
        self.adjacency[v as usize].push(u);
        self.edge_count += 1;

        true
    }

    /// Remove an edge, remembering where it sat so it can be restored
    pub fn take_edge(&mut self, u: u32, v: u32) -> Option<EdgeSlot> {
        let pos_in_u = self.adjacency[u as usize].iter().position(|&x| x == v)?;
        let pos_in_v = self.adjacency[v as usize].iter().position(|&x| x == u)?;

        self.adjacency[u as usize].remove(pos_in_u);
        self.adjacency[v as usize].remove(pos_in_v);
        self.edge_count -= 1;

        Some(EdgeSlot {
            u,
            v,
            pos_in_u,
            pos_in_v,
        })
    }

    /// Undo a `take_edge`, reinserting the edge at its original positions
    pub fn restore_edge(&mut self, slot: EdgeSlot) {
        self.adjacency[slot.u as usize].insert(slot.pos_in_u, slot.v);
        self.adjacency[slot.v as usize].insert(slot.pos_in_v, slot.u);
        self.edge_count += 1;
    }

    /// Remove an edge permanently
    pub fn remove_edge(&mut self, u: u32, v: u32) -> bool {
        self.take_edge(u, v).is_some()
    }

    /// Edges in canonical order: nodes in index order, neighbours in
    /// insertion order, each edge reported once from its lower endpoint
    pub fn edges(&self) -> Vec<EdgeKey> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            let u = u as u32;
            for &v in neighbors {
                if u < v {
                    edges.push((u, v));
                }
            }
        }
        edges
    }

    /// Edges resolved back to their string IDs
    pub fn edge_list(&self) -> Vec<(String, String)> {
        self.edges()
            .into_iter()
            .map(|(u, v)| (self.node_id(u).to_string(), self.node_id(v).to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(ids: &[&str]) -> TopologyGraph {
        let mut graph = TopologyGraph::with_capacity(ids.len());
        for pair in ids.windows(2) {
            let u = graph.get_or_create_node(pair[0]);
            let v = graph.get_or_create_node(pair[1]);
            graph.add_edge(u, v);
        }
        graph
    }

    #[test]
    fn rejects_self_loops_and_duplicates() {
        let mut graph = path(&["a", "b"]);
        assert!(!graph.add_edge(0, 0));
        assert!(!graph.add_edge(0, 1));
        assert!(!graph.add_edge(1, 0));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degrees(), vec![1, 1]);
    }

    #[test]
    fn edges_follow_first_seen_order() {
        let graph = path(&["c", "a", "b"]);
        assert_eq!(graph.edges(), vec![(0, 1), (1, 2)]);
        assert_eq!(
            graph.edge_list(),
            vec![
                ("c".to_string(), "a".to_string()),
                ("a".to_string(), "b".to_string())
            ]
        );
        assert_eq!(graph.index_of("b"), Some(2));
        assert_eq!(graph.index_of("z"), None);
    }

    #[test]
    fn restore_puts_edge_back_in_place() {
        let mut graph = path(&["a", "b", "c", "d"]);
        let d = graph.index_of("d").unwrap();
        let a = graph.index_of("a").unwrap();
        graph.add_edge(a, d);
        let before = graph.edges();

        let slot = graph.take_edge(1, 2).unwrap();
        assert_eq!(slot.endpoints(), (1, 2));
        assert_eq!(graph.edge_count(), 3);
        assert!(!graph.has_edge(2, 1));

        graph.restore_edge(slot);
        assert_eq!(graph.edges(), before);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn removing_missing_edge_is_a_no_op() {
        let mut graph = path(&["a", "b", "c"]);
        assert!(!graph.remove_edge(0, 2));
        assert!(graph.remove_edge(0, 1));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree(0), 0);
    }
}
