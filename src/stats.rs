//! Graph and search-quality statistics
//!
//! Tooling helpers over an exported [`AdjacencyTable`]: degree summaries,
//! small-cycle counts, id locality of edges and recall against ground truth.

use crate::reorder::in_degrees;
use crate::types::{AdjacencyTable, NodeId};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// Summary of an index graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub node_count: usize,
    pub max_nodes: usize,
    pub total_edges: usize,
    pub avg_out_degree: f64,
    pub max_out_degree: usize,
    pub max_in_degree: usize,
}

impl IndexStats {
    pub fn from_table(table: &AdjacencyTable, max_nodes: usize) -> Self {
        let total_edges: usize = table.iter().map(Vec::len).sum();
        let avg_out_degree = if table.is_empty() {
            0.0
        } else {
            total_edges as f64 / table.len() as f64
        };
        Self {
            node_count: table.len(),
            max_nodes,
            total_edges,
            avg_out_degree,
            max_out_degree: table.iter().map(Vec::len).max().unwrap_or(0),
            max_in_degree: in_degrees(table).into_iter().max().unwrap_or(0),
        }
    }
}

/// Out-degree histogram: `result[d]` nodes have exactly `d` neighbors
pub fn degree_distribution(table: &AdjacencyTable) -> Vec<usize> {
    let max = table.iter().map(Vec::len).max().unwrap_or(0);
    let mut histogram = vec![0usize; max + 1];
    for row in table {
        histogram[row.len()] += 1;
    }
    histogram
}

/// Undirected view: symmetric, sorted, no self-edges or duplicates
fn undirected(table: &AdjacencyTable) -> Vec<Vec<NodeId>> {
    let mut sets: Vec<AHashSet<NodeId>> = vec![AHashSet::new(); table.len()];
    for (node, row) in table.iter().enumerate() {
        let node = node as NodeId;
        for &target in row {
            if target != node {
                sets[node as usize].insert(target);
                sets[target as usize].insert(node);
            }
        }
    }
    sets.into_iter()
        .map(|set| {
            let mut row: Vec<NodeId> = set.into_iter().collect();
            row.sort_unstable();
            row
        })
        .collect()
}

/// Number of triangles in the undirected view of the graph
pub fn count_triangles(table: &AdjacencyTable) -> usize {
    let graph = undirected(table);
    let mut count = 0;
    for (a, row) in graph.iter().enumerate() {
        let a = a as NodeId;
        for &b in row.iter().filter(|&&b| b > a) {
            // common neighbors above b, by merging two sorted lists
            let (mut i, mut j) = (0, 0);
            let other = &graph[b as usize];
            while i < row.len() && j < other.len() {
                match row[i].cmp(&other[j]) {
                    std::cmp::Ordering::Less => i += 1,
                    std::cmp::Ordering::Greater => j += 1,
                    std::cmp::Ordering::Equal => {
                        if row[i] > b {
                            count += 1;
                        }
                        i += 1;
                        j += 1;
                    }
                }
            }
        }
    }
    count
}

/// Number of 4-cycles in the undirected view of the graph
pub fn count_squares(table: &AdjacencyTable) -> usize {
    let graph = undirected(table);
    // paths a - center - b per endpoint pair
    let mut wedges: AHashMap<(NodeId, NodeId), usize> = AHashMap::new();
    for row in &graph {
        for (i, &a) in row.iter().enumerate() {
            for &b in &row[i + 1..] {
                *wedges.entry((a, b)).or_insert(0) += 1;
            }
        }
    }
    // each square is found once from either diagonal
    wedges.values().map(|&w| w * w.saturating_sub(1) / 2).sum::<usize>() / 2
}

/// Largest id difference across any edge
pub fn bandwidth(table: &AdjacencyTable) -> usize {
    table
        .iter()
        .enumerate()
        .flat_map(|(node, row)| row.iter().map(move |&t| node.abs_diff(t as usize)))
        .max()
        .unwrap_or(0)
}

/// Mean id difference across edges
pub fn mean_edge_span(table: &AdjacencyTable) -> f64 {
    let (sum, edges) = table
        .iter()
        .enumerate()
        .flat_map(|(node, row)| row.iter().map(move |&t| node.abs_diff(t as usize)))
        .fold((0usize, 0usize), |(sum, n), span| (sum + span, n + 1));
    if edges == 0 {
        0.0
    } else {
        sum as f64 / edges as f64
    }
}

/// Fraction of the true top-`k` found in the returned top-`k`, over all queries.
///
/// `results[q]` and `ground_truth[q]` are labels for query `q`, best first;
/// only the first `k` of each are considered.
pub fn compute_recall<L: PartialEq>(results: &[Vec<L>], ground_truth: &[Vec<L>], k: usize) -> f64 {
    let queries = results.len().min(ground_truth.len());
    if queries == 0 || k == 0 {
        return 0.0;
    }
    let hits: usize = results
        .iter()
        .zip(ground_truth)
        .map(|(found, truth)| {
            let truth = &truth[..truth.len().min(k)];
            found.iter().take(k).filter(|label| truth.contains(*label)).count()
        })
        .sum();
    hits as f64 / (queries * k) as f64
}
