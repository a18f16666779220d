//! Greedy beam search over the node arena
//!
//! Both functions are free of index state: they borrow the arena, the metric
//! and a visited marker, so a frozen index can be queried from several
//! threads as long as every caller brings its own marker.

use super::heap::{Candidate, DistanceQueue};
use super::store::NodeStore;
use super::visited::VisitedMarker;
use crate::distance::DistanceMetric;
use crate::types::{Label, NodeId};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Pick the entry node for a search.
///
/// Probes every `len / n_initializations`-th node (stride at least 1) and
/// returns the probe closest to `query`. Deterministic; `None` on an empty
/// arena.
pub fn search_initialization<L: Label>(
    store: &NodeStore<L>,
    metric: &dyn DistanceMetric,
    query: &[u8],
    n_initializations: usize,
) -> Option<NodeId> {
    let len = store.len();
    if len == 0 {
        return None;
    }
    let step = (len / n_initializations.max(1)).max(1);

    let mut best = Candidate::new(0, f32::INFINITY);
    for id in (0..len).step_by(step) {
        let id = id as NodeId;
        let dist = metric.distance(query, store.data(id));
        if dist < best.distance {
            best = Candidate::new(id, dist);
        }
    }
    Some(best.id)
}

/// Beam search from `entry` keeping the `ef` best nodes seen.
///
/// `on_traverse(from, to)` fires whenever the search steps along an edge to
/// a node it has not visited yet; pass `|_, _| {}` when not profiling.
///
/// Returns the buffer of at most `ef` candidates (worst on top).
pub fn beam_search<L, F>(
    store: &NodeStore<L>,
    metric: &dyn DistanceMetric,
    visited: &mut VisitedMarker,
    query: &[u8],
    entry: NodeId,
    ef: usize,
    mut on_traverse: F,
) -> DistanceQueue
where
    L: Label,
    F: FnMut(NodeId, NodeId),
{
    let ef = ef.max(1);
    let mut neighbors = DistanceQueue::with_capacity(ef + 1);
    let mut candidates = BinaryHeap::new();

    visited.clear();
    let entry = Candidate::new(entry, metric.distance(query, store.data(entry)));
    candidates.push(Reverse(entry));
    neighbors.push(entry);
    visited.insert(entry.id);

    while let Some(&Reverse(nearest)) = candidates.peek() {
        let worst = neighbors.peek().map_or(f32::INFINITY, |c| c.distance);
        if nearest.distance > worst && neighbors.len() >= ef {
            break;
        }
        candidates.pop();

        for next in store.links(nearest.id).neighbors() {
            if !visited.insert(next) {
                continue;
            }
            on_traverse(nearest.id, next);

            let dist = metric.distance(query, store.data(next));
            let worst = neighbors.peek().map_or(f32::INFINITY, |c| c.distance);
            if neighbors.len() < ef || dist < worst {
                let candidate = Candidate::new(next, dist);
                candidates.push(Reverse(candidate));
                neighbors.push(candidate);
                if neighbors.len() > ef {
                    neighbors.pop();
                }
            }
        }
    }

    neighbors
}
