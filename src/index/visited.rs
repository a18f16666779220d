//! Generation-based visited marker for graph traversal
//!
//! Each `clear()` bumps a generation counter instead of zeroing the table, so
//! repeated searches over the same arena never pay an O(N) reset.

use crate::types::NodeId;

/// Mark-based visited set over dense node ids.
///
/// A node is visited iff its stored generation equals the current one.
#[derive(Debug, Clone)]
pub struct VisitedMarker {
    marks: Vec<u16>,
    generation: u16,
}

impl VisitedMarker {
    pub fn new(capacity: usize) -> Self {
        Self {
            marks: vec![0u16; capacity],
            generation: 1,
        }
    }

    /// Forget every mark. O(1) except once every 65534 calls, when the
    /// counter wraps and the table is zeroed.
    pub fn clear(&mut self) {
        if self.generation == u16::MAX {
            self.marks.fill(0);
            self.generation = 1;
        } else {
            self.generation += 1;
        }
    }

    /// Mark `id`. Returns `true` if it was not visited before.
    #[inline]
    pub fn insert(&mut self, id: NodeId) -> bool {
        let slot = &mut self.marks[id as usize];
        if *slot == self.generation {
            false
        } else {
            *slot = self.generation;
            true
        }
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.marks[id as usize] == self.generation
    }

    pub fn capacity(&self) -> usize {
        self.marks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_clear() {
        let mut visited = VisitedMarker::new(100);
        assert!(visited.insert(0));
        assert!(!visited.insert(0));
        assert!(visited.contains(0));
        assert!(!visited.contains(50));

        visited.clear();
        assert!(!visited.contains(0));
        assert!(visited.insert(0));
    }

    #[test]
    fn test_generation_wrap() {
        let mut visited = VisitedMarker::new(10);
        for _ in 0..65534 {
            visited.clear();
        }
        assert_eq!(visited.generation, u16::MAX);
        visited.insert(5);

        visited.clear();
        assert_eq!(visited.generation, 1);
        assert!(!visited.contains(5));
    }
}
