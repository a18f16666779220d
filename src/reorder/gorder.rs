//! Windowed greedy orderings (Gorder family)
//!
//! Nodes are placed one at a time. Each placement raises the score of nodes
//! sharing an edge or an in-neighbor with it; when a node slides out of the
//! last `window` placements its contribution is withdrawn. The next node is
//! always the highest-scoring one still unplaced.

use super::gorder_queue::GorderPriorityQueue;
use super::{check_weights, transpose};
use super::weighted_queue::WeightedPriorityQueue;
use crate::error::Result;
use crate::types::{order_to_permutation, AdjacencyTable, EdgeWeights, NodeId, Permutation};

/// Visits the out-neighbors of `v`, its in-neighbors, and the
/// out-neighbors of those in-neighbors
fn for_each_related<F>(table: &AdjacencyTable, in_table: &AdjacencyTable, v: NodeId, mut visit: F)
where
    F: FnMut(NodeId),
{
    for &u in &table[v as usize] {
        visit(u);
    }
    for &u in &in_table[v as usize] {
        visit(u);
        for &w in &table[u as usize] {
            visit(w);
        }
    }
}

/// Visits every node that is a child of two distinct in-neighbors of `v`,
/// once per such pair
fn for_each_shared_child<F>(table: &AdjacencyTable, in_table: &AdjacencyTable, v: NodeId, mut visit: F)
where
    F: FnMut(NodeId),
{
    let parents = &in_table[v as usize];
    for (i, &a) in parents.iter().enumerate() {
        for &b in &parents[i + 1..] {
            if a == b {
                continue;
            }
            let other = &table[b as usize];
            for &child in &table[a as usize] {
                if other.contains(&child) {
                    visit(child);
                }
            }
        }
    }
}

/// Shared windowed loop over the unit-step queue
fn windowed_order(table: &AdjacencyTable, window: usize, shared_parent_correction: bool) -> Permutation {
    let n = table.len();
    if n == 0 {
        return Vec::new();
    }
    let in_table = transpose(table);
    let mut queue = GorderPriorityQueue::new(n);
    let mut order: Vec<NodeId> = Vec::with_capacity(n);

    queue.increment(0);
    order.extend(queue.pop());

    for i in 1..n {
        let entering = order[i - 1];
        for_each_related(table, &in_table, entering, |u| queue.increment(u));
        if shared_parent_correction {
            for_each_shared_child(table, &in_table, entering, |u| queue.decrement(u));
        }

        if i > window + 1 {
            let leaving = order[i - window - 1];
            for_each_related(table, &in_table, leaving, |u| queue.decrement(u));
            if shared_parent_correction {
                for_each_shared_child(table, &in_table, leaving, |u| queue.increment(u));
            }
        }

        match queue.pop() {
            Some(next) => order.push(next),
            None => break,
        }
    }

    order_to_permutation(&order)
}

/// Gorder with window width `window`, seeded at node 0
pub fn g_order(table: &AdjacencyTable, window: usize) -> Permutation {
    windowed_order(table, window, false)
}

/// Gorder with a correction for nodes reachable from two in-neighbors of
/// the placed node: such a node was raised once per parent, so one raise is
/// taken back per parent pair (and restored when the node leaves the window).
///
/// Pairs are distinct and unordered, so a child shared by `k` in-neighbors
/// is corrected `k * (k - 1) / 2` times.
pub fn bc_order(table: &AdjacencyTable, window: usize) -> Permutation {
    windowed_order(table, window, true)
}

/// Gorder where every raise is the weight of the edge it comes from.
///
/// `weights[i][j]` is the weight of `i -> table[i][j]`; an in-edge `u -> v`
/// carries the same weight as its out-edge. Fails with `InvalidArgument`
/// unless `weights` has the shape of `table`.
pub fn weighted_g_order(table: &AdjacencyTable, weights: &EdgeWeights, window: usize) -> Result<Permutation> {
    check_weights(table, weights)?;
    let n = table.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut in_table: Vec<Vec<(NodeId, f32)>> = vec![Vec::new(); n];
    for (node, (row, row_weights)) in table.iter().zip(weights).enumerate() {
        for (&target, &weight) in row.iter().zip(row_weights) {
            in_table[target as usize].push((node as NodeId, weight));
        }
    }

    let visit = |queue: &mut WeightedPriorityQueue, v: NodeId, sign: f32| {
        for (&u, &w) in table[v as usize].iter().zip(&weights[v as usize]) {
            queue.increment(u, sign * w);
        }
        for &(u, w) in &in_table[v as usize] {
            queue.increment(u, sign * w);
            for (&x, &wx) in table[u as usize].iter().zip(&weights[u as usize]) {
                queue.increment(x, sign * wx);
            }
        }
    };

    let mut queue = WeightedPriorityQueue::new(n);
    let mut order: Vec<NodeId> = Vec::with_capacity(n);
    queue.increment(0, 1.0);
    order.extend(queue.pop());

    for i in 1..n {
        visit(&mut queue, order[i - 1], 1.0);
        if i > window + 1 {
            visit(&mut queue, order[i - window - 1], -1.0);
        }
        match queue.pop() {
            Some(next) => order.push(next),
            None => break,
        }
    }

    Ok(order_to_permutation(&order))
}
