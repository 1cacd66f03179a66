//! Graph algorithms used by the mutation engine and the statistics pass

use std::collections::{HashMap, VecDeque};

use petgraph::algo::{connected_components, dijkstra};
use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;

use crate::error::CentralityError;
use crate::graph::{edge_key, EdgeKey, TopologyGraph};

/// Node count from which per-source searches are spread over the rayon pool
pub const PARALLEL_THRESHOLD: usize = 512;

/// Sources handled per work unit. Fixed so that partial sums are combined in
/// the same order whether or not the work runs in parallel.
const SOURCE_CHUNK: usize = 64;

/// Capability answering connectivity questions about a graph
pub trait Connectivity {
    /// Number of connected components, counting isolated nodes
    fn component_count(&self, graph: &TopologyGraph) -> usize;

    fn is_connected(&self, graph: &TopologyGraph) -> bool {
        self.component_count(graph) == 1
    }
}

/// Union-find data structure for connected component analysis
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Size of each set (for union by size)
    rank: Vec<u32>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            rank: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let px = self.parent[x as usize];
        if px != x {
            self.parent[x as usize] = self.find(px);
        }
        self.parent[x as usize]
    }

    /// Union the sets containing x and y; returns whether they were separate
    pub fn union(&mut self, x: u32, y: u32) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false;
        }

        // Attach smaller tree under root of larger tree
        if self.rank[root_x as usize] > self.rank[root_y as usize] {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += self.rank[root_y as usize];
        } else {
            self.parent[root_x as usize] = root_y;
            self.rank[root_y as usize] += self.rank[root_x as usize];
        }
        true
    }
}

/// Connectivity via a single union-find pass over the edge list
#[derive(Debug, Clone, Copy, Default)]
pub struct UnionFindConnectivity;

impl Connectivity for UnionFindConnectivity {
    fn component_count(&self, graph: &TopologyGraph) -> usize {
        let mut sets = DisjointSets::new(graph.node_count());
        let mut components = graph.node_count();
        for (u, v) in graph.edges() {
            if sets.union(u, v) {
                components -= 1;
            }
        }
        components
    }
}

/// Connectivity via petgraph's component counter
#[derive(Debug, Clone, Copy, Default)]
pub struct PetgraphConnectivity;

impl Connectivity for PetgraphConnectivity {
    fn component_count(&self, graph: &TopologyGraph) -> usize {
        connected_components(&to_petgraph(graph))
    }
}

/// Immutable petgraph view of the graph, node indices preserved
pub fn to_petgraph(graph: &TopologyGraph) -> UnGraph<(), ()> {
    let mut view = UnGraph::with_capacity(graph.node_count(), graph.edge_count());
    for _ in 0..graph.node_count() {
        view.add_node(());
    }
    for (u, v) in graph.edges() {
        view.add_edge(NodeIndex::new(u as usize), NodeIndex::new(v as usize), ());
    }
    view
}

/// Run `per_source` for every node and add up the `width`-long partial vectors.
///
/// Sources are grouped in fixed chunks; chunk results are summed in source
/// order, so parallel and sequential runs agree bit for bit.
fn sum_over_sources<F>(node_count: usize, width: usize, per_source: F) -> Vec<f64>
where
    F: Fn(usize, &mut [f64]) + Sync,
{
    let chunk_starts: Vec<usize> = (0..node_count).step_by(SOURCE_CHUNK).collect();

    let run_chunk = |&start: &usize| {
        let mut partial = vec![0.0; width];
        let end = std::cmp::min(start + SOURCE_CHUNK, node_count);
        for source in start..end {
            per_source(source, &mut partial);
        }
        partial
    };

    let partials: Vec<Vec<f64>> = if node_count >= PARALLEL_THRESHOLD {
        chunk_starts.par_iter().map(run_chunk).collect()
    } else {
        chunk_starts.iter().map(run_chunk).collect()
    };

    let mut total = vec![0.0; width];
    for partial in partials {
        for (acc, value) in total.iter_mut().zip(partial) {
            *acc += value;
        }
    }
    total
}

/// Edge betweenness centrality (Brandes, unweighted).
///
/// Each value is the fraction of shortest paths between ordered node pairs
/// that run through the edge, scaled by `1 / (n (n - 1))`.
pub fn edge_betweenness(graph: &TopologyGraph) -> Result<HashMap<EdgeKey, f64>, CentralityError> {
    let node_count = graph.node_count();
    if node_count == 0 {
        return Err(CentralityError::EmptyGraph);
    }

    let edges = graph.edges();
    let edge_index: HashMap<EdgeKey, usize> =
        edges.iter().enumerate().map(|(i, &key)| (key, i)).collect();

    let totals = sum_over_sources(node_count, edges.len(), |source, partial| {
        accumulate_edge_dependencies(graph, &edge_index, source, partial);
    });

    let scale = if node_count > 1 {
        1.0 / (node_count as f64 * (node_count - 1) as f64)
    } else {
        1.0
    };

    let mut betweenness = HashMap::with_capacity(edges.len());
    for (&(u, v), total) in edges.iter().zip(totals) {
        let value = total * scale;
        if !value.is_finite() {
            return Err(CentralityError::NonFinite {
                from: graph.node_id(u).to_string(),
                to: graph.node_id(v).to_string(),
                value,
            });
        }
        betweenness.insert((u, v), value);
    }

    Ok(betweenness)
}

/// Single-source stage of Brandes' algorithm, adding edge dependencies
fn accumulate_edge_dependencies(
    graph: &TopologyGraph,
    edge_index: &HashMap<EdgeKey, usize>,
    source: usize,
    partial: &mut [f64],
) {
    let node_count = graph.node_count();

    // Nodes in order of non-decreasing distance from source
    let mut order: Vec<usize> = Vec::with_capacity(node_count);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut num_paths = vec![0.0_f64; node_count];
    let mut distance: Vec<i64> = vec![-1; node_count];

    num_paths[source] = 1.0;
    distance[source] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        for &w in graph.neighbors(v as u32) {
            let w = w as usize;
            if distance[w] < 0 {
                distance[w] = distance[v] + 1;
                queue.push_back(w);
            }
            if distance[w] == distance[v] + 1 {
                num_paths[w] += num_paths[v];
                predecessors[w].push(v);
            }
        }
    }

    // Back-propagate dependencies from the farthest nodes
    let mut dependency = vec![0.0_f64; node_count];
    while let Some(w) = order.pop() {
        let coefficient = (1.0 + dependency[w]) / num_paths[w];
        for &v in &predecessors[w] {
            let contribution = num_paths[v] * coefficient;
            let key = edge_key(v as u32, w as u32);
            if let Some(&idx) = edge_index.get(&key) {
                partial[idx] += contribution;
            }
            dependency[v] += contribution;
        }
    }
}

/// Sum of hop distances over all ordered pairs of distinct, mutually
/// reachable nodes
pub fn total_shortest_path_length(graph: &TopologyGraph) -> f64 {
    let view = to_petgraph(graph);
    let totals = sum_over_sources(graph.node_count(), 1, |source, partial| {
        let distances = dijkstra(&view, NodeIndex::new(source), None, |_| 1usize);
        partial[0] += distances.values().sum::<usize>() as f64;
    });
    totals[0]
}
