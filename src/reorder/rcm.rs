//! Reverse Cuthill-McKee orderings
//!
//! Breadth-first layout seeded from low-degree nodes, neighbors enqueued in
//! ascending degree, then reversed. Keeps edges between nearby ids.

use super::check_weights;
use crate::error::Result;
use crate::types::{order_to_permutation, AdjacencyTable, EdgeWeights, NodeId, Permutation};
use ahash::AHashSet;
use std::collections::VecDeque;

/// Cuthill-McKee visit order with nodes ranked by `key` (ascending, stable)
fn cuthill_mckee(table: &AdjacencyTable, key: &[f64]) -> Vec<NodeId> {
    let n = table.len();
    let by_key = |a: &NodeId, b: &NodeId| key[*a as usize].total_cmp(&key[*b as usize]);

    let mut seeds: Vec<NodeId> = (0..n as NodeId).collect();
    seeds.sort_by(by_key);

    let mut listed = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut queue = VecDeque::new();

    for seed in seeds {
        if listed[seed as usize] {
            continue;
        }
        queue.push_back(seed);

        while let Some(node) = queue.pop_front() {
            if listed[node as usize] {
                continue;
            }
            listed[node as usize] = true;
            order.push(node);

            let mut neighbors = table[node as usize].clone();
            neighbors.sort_by(by_key);
            queue.extend(neighbors);
        }
    }

    order.reverse();
    order
}

/// RCM ranked by out-degree
pub fn rcm_order(table: &AdjacencyTable) -> Permutation {
    let degrees: Vec<f64> = table.iter().map(|row| row.len() as f64).collect();
    order_to_permutation(&cuthill_mckee(table, &degrees))
}

/// Adds every neighbor-of-neighbor to each row, without duplicates or
/// self-edges. The input table is left untouched.
pub(crate) fn two_hop_table(table: &AdjacencyTable) -> AdjacencyTable {
    table
        .iter()
        .enumerate()
        .map(|(node, row)| {
            let node = node as NodeId;
            let mut seen: AHashSet<NodeId> = row.iter().copied().collect();
            let mut extended = row.clone();
            for &neighbor in row {
                for &hop in &table[neighbor as usize] {
                    if hop != node && seen.insert(hop) {
                        extended.push(hop);
                    }
                }
            }
            extended
        })
        .collect()
}

/// RCM over the two-hop closure of the graph
pub fn rcm_order_2hop(table: &AdjacencyTable) -> Permutation {
    let extended = two_hop_table(table);
    rcm_order(&extended)
}

/// RCM ranked by weighted out-degree (sum of edge weights).
///
/// `weights` must have the shape of `table`.
pub fn weighted_rcm_order(table: &AdjacencyTable, weights: &EdgeWeights) -> Result<Permutation> {
    check_weights(table, weights)?;
    let degrees: Vec<f64> = weights
        .iter()
        .map(|row| row.iter().map(|&w| w as f64).sum())
        .collect();
    Ok(order_to_permutation(&cuthill_mckee(table, &degrees)))
}
