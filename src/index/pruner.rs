//! Neighbor selection heuristics
//!
//! The diversity rule keeps a candidate only when no already-kept neighbor is
//! closer to it than the base node is, so each kept edge reaches a part of
//! the space the others do not.

use super::heap::Candidate;
use crate::types::NodeId;

/// Heuristic neighbor selection
///
/// Prunes `candidates` (distances measured from the base node) to at most
/// `max_degree` entries.
///
/// # Arguments
/// * `candidates` - Candidate pool with distances to the base node
/// * `max_degree` - Maximum number of neighbors (M)
/// * `distance_fn` - Distance between two candidate nodes
///
/// # Returns
/// The pool unchanged if it already fits, otherwise the kept candidates in
/// ascending distance order
pub fn select_neighbors<F>(
    candidates: Vec<Candidate>,
    max_degree: usize,
    distance_fn: F,
) -> Vec<Candidate>
where
    F: Fn(NodeId, NodeId) -> f32,
{
    if candidates.len() <= max_degree {
        return candidates;
    }
    diversify(candidates, max_degree, distance_fn)
}

/// Diversity pass of [`select_neighbors`] without the size short-cut.
///
/// Always sorts and filters, even when the pool already fits.
pub fn diversify<F>(mut candidates: Vec<Candidate>, max_degree: usize, distance_fn: F) -> Vec<Candidate>
where
    F: Fn(NodeId, NodeId) -> f32,
{
    candidates.sort();

    let mut kept: Vec<Candidate> = Vec::with_capacity(max_degree);
    for candidate in candidates {
        if kept.len() >= max_degree {
            break;
        }

        let reachable_via_kept = kept
            .iter()
            .any(|k| distance_fn(k.id, candidate.id) < candidate.distance);

        if !reachable_via_kept {
            kept.push(candidate);
        }
    }

    kept
}

/// Keeps the `max_degree` nearest candidates, ascending
pub fn nearest_prune(mut candidates: Vec<Candidate>, max_degree: usize) -> Vec<Candidate> {
    candidates.sort();
    candidates.truncate(max_degree);
    candidates
}
