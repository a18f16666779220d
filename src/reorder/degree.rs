//! Degree-driven orderings: plain degree sorts, hub sorting/clustering and
//! degree-based grouping (DBG)

use super::in_degrees;
use crate::types::{order_to_permutation, AdjacencyTable, NodeId, Permutation};

/// Nodes by descending in-degree, ties by id
pub fn indegree_order(table: &AdjacencyTable) -> Permutation {
    let degrees = in_degrees(table);
    let mut order: Vec<NodeId> = (0..table.len() as NodeId).collect();
    order.sort_by(|&a, &b| degrees[b as usize].cmp(&degrees[a as usize]));
    order_to_permutation(&order)
}

/// Nodes by descending out-degree, ties by id
pub fn outdegree_order(table: &AdjacencyTable) -> Permutation {
    let mut order: Vec<NodeId> = (0..table.len() as NodeId).collect();
    order.sort_by(|&a, &b| table[b as usize].len().cmp(&table[a as usize].len()));
    order_to_permutation(&order)
}

/// Splits nodes into hubs (in-degree at least the mean) and the rest
fn partition_hubs(table: &AdjacencyTable) -> (Vec<NodeId>, Vec<NodeId>, Vec<usize>) {
    let degrees = in_degrees(table);
    let total: usize = degrees.iter().sum();
    let mean = total as f64 / table.len().max(1) as f64;

    let (hubs, rest): (Vec<NodeId>, Vec<NodeId>) =
        (0..table.len() as NodeId).partition(|&n| degrees[n as usize] as f64 >= mean);
    (hubs, rest, degrees)
}

/// Hubs first, sorted by descending in-degree, then everything else in id order
pub fn hubsort_order(table: &AdjacencyTable) -> Permutation {
    let (mut hubs, rest, degrees) = partition_hubs(table);
    hubs.sort_by(|&a, &b| degrees[b as usize].cmp(&degrees[a as usize]));
    hubs.extend(rest);
    order_to_permutation(&hubs)
}

/// Hubs first, then everything else, both in id order
pub fn hubcluster_order(table: &AdjacencyTable) -> Permutation {
    let (mut hubs, rest, _) = partition_hubs(table);
    hubs.extend(rest);
    order_to_permutation(&hubs)
}

/// Degree-based grouping.
///
/// Thresholds are the in-degrees found at the `i * N / groups` positions of
/// the sorted degree list; a node joins the last group whose threshold its
/// degree exceeds (group 0 otherwise). Groups are concatenated in ascending
/// order and the whole sequence is reversed, so high-degree groups come first.
pub fn dbg_order(table: &AdjacencyTable, groups: usize) -> Permutation {
    let n = table.len();
    if n == 0 {
        return Vec::new();
    }
    let groups = groups.max(1);
    let degrees = in_degrees(table);

    let mut quantiles = degrees.clone();
    quantiles.sort_unstable();
    let thresholds: Vec<usize> = (0..groups).map(|i| quantiles[i * n / groups]).collect();

    let mut buckets: Vec<Vec<NodeId>> = vec![Vec::new(); groups];
    for (node, &deg) in degrees.iter().enumerate() {
        let group = thresholds.iter().rposition(|&t| deg > t).unwrap_or(0);
        buckets[group].push(node as NodeId);
    }

    let mut order: Vec<NodeId> = buckets.into_iter().flatten().collect();
    order.reverse();
    order_to_permutation(&order)
}
