//! Distance-keyed priority queues used by beam search and pruning

use crate::types::NodeId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Candidate neighbor with distance
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub id: NodeId,
    pub distance: f32,
}

impl Candidate {
    pub fn new(id: NodeId, distance: f32) -> Self {
        Self { id, distance }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    /// Larger distance compares greater; equal distances fall back to the
    /// node id so heap order is reproducible.
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Max-heap of candidates keyed by distance (worst on top)
#[derive(Debug, Default, Clone)]
pub struct DistanceQueue {
    heap: BinaryHeap<Candidate>,
}

impl DistanceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, candidate: Candidate) {
        self.heap.push(candidate);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Candidate> {
        self.heap.pop()
    }

    /// Worst (largest-distance) candidate
    #[inline]
    pub fn peek(&self) -> Option<&Candidate> {
        self.heap.peek()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop the worst candidates until at most `k` remain
    pub fn truncate(&mut self, k: usize) {
        while self.heap.len() > k {
            self.heap.pop();
        }
    }

    /// Consume the queue, nearest first
    pub fn into_sorted_vec(self) -> Vec<Candidate> {
        self.heap.into_sorted_vec()
    }
}

impl FromIterator<Candidate> for DistanceQueue {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        Self {
            heap: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_ordering() {
        let near = Candidate::new(1, 1.0);
        let far = Candidate::new(2, 2.0);
        assert!(far > near);

        // equal distances order by id
        assert!(Candidate::new(3, 1.0) > Candidate::new(1, 1.0));
    }

    #[test]
    fn test_queue_keeps_worst_on_top() {
        let mut queue: DistanceQueue = [
            Candidate::new(1, 3.0),
            Candidate::new(2, 1.0),
            Candidate::new(3, 2.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(queue.peek().map(|c| c.id), Some(1));
        queue.truncate(2);
        assert_eq!(queue.len(), 2);

        let ids: Vec<_> = queue.into_sorted_vec().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
