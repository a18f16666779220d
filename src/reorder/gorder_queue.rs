//! Unit-step bucket priority queue used by Gorder and BCORDER
//!
//! Priorities change by exactly one per call, so a key only ever moves to an
//! adjacent bucket. The queue keeps one doubly linked list ordered by
//! descending priority, with the first and last entry of every non-empty
//! bucket indexed, making increment, decrement and pop O(1).

use crate::types::NodeId;
use ahash::AHashMap;

const NIL: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Entry {
    priority: i64,
    prev: usize,
    next: usize,
    queued: bool,
}

/// Integer priority queue over keys `0..n`.
///
/// A key that changes bucket is placed at the end of its new bucket, so
/// among equal priorities the most recently moved key pops last.
#[derive(Debug, Clone)]
pub struct GorderPriorityQueue {
    entries: Vec<Entry>,
    first_of: AHashMap<i64, usize>,
    last_of: AHashMap<i64, usize>,
    head: usize,
    len: usize,
}

impl GorderPriorityQueue {
    /// Queue holding keys `0..n` at priority 0, in key order
    pub fn new(n: usize) -> Self {
        let entries: Vec<Entry> = (0..n)
            .map(|i| Entry {
                priority: 0,
                prev: i.wrapping_sub(1),
                next: if i + 1 == n { NIL } else { i + 1 },
                queued: true,
            })
            .collect();

        let mut first_of = AHashMap::new();
        let mut last_of = AHashMap::new();
        if n > 0 {
            first_of.insert(0, 0);
            last_of.insert(0, n - 1);
        }

        Self {
            entries,
            first_of,
            last_of,
            head: if n == 0 { NIL } else { 0 },
            len: n,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, key: NodeId) -> bool {
        self.entries
            .get(key as usize)
            .map_or(false, |e| e.queued)
    }

    pub fn priority(&self, key: NodeId) -> Option<i64> {
        self.entries
            .get(key as usize)
            .filter(|e| e.queued)
            .map(|e| e.priority)
    }

    /// Raise `key` by one; ignored for popped or unknown keys
    pub fn increment(&mut self, key: NodeId) {
        let slot = key as usize;
        if !self.contains(key) {
            return;
        }
        let p = self.entries[slot].priority;
        let old_prev = self.unlink(slot);

        let anchor = match self.last_of.get(&(p + 1)) {
            Some(&last) => last,
            None => match self.first_of.get(&p) {
                Some(&first) => self.entries[first].prev,
                None => old_prev,
            },
        };
        self.entries[slot].priority = p + 1;
        self.link_after(slot, anchor);
    }

    /// Lower `key` by one; ignored for popped or unknown keys
    pub fn decrement(&mut self, key: NodeId) {
        let slot = key as usize;
        if !self.contains(key) {
            return;
        }
        let p = self.entries[slot].priority;
        let old_prev = self.unlink(slot);

        let anchor = match self.last_of.get(&(p - 1)) {
            Some(&last) => last,
            None => match self.last_of.get(&p) {
                Some(&last) => last,
                None => old_prev,
            },
        };
        self.entries[slot].priority = p - 1;
        self.link_after(slot, anchor);
    }

    /// Remove and return the highest-priority key
    pub fn pop(&mut self) -> Option<NodeId> {
        if self.head == NIL {
            return None;
        }
        let slot = self.head;
        self.unlink(slot);
        self.entries[slot].queued = false;
        Some(slot as NodeId)
    }

    /// Queued `(key, priority)` pairs from head to tail
    pub fn ordered(&self) -> Vec<(NodeId, i64)> {
        let mut out = Vec::with_capacity(self.len);
        let mut current = self.head;
        while current != NIL {
            out.push((current as NodeId, self.entries[current].priority));
            current = self.entries[current].next;
        }
        out
    }

    /// Detach `slot`, fixing bucket bounds. Returns its former predecessor.
    fn unlink(&mut self, slot: usize) -> usize {
        let Entry {
            priority,
            prev,
            next,
            ..
        } = self.entries[slot];

        let first = self.first_of.get(&priority).copied();
        let last = self.last_of.get(&priority).copied();
        match (first == Some(slot), last == Some(slot)) {
            (true, true) => {
                self.first_of.remove(&priority);
                self.last_of.remove(&priority);
            }
            (true, false) => {
                self.first_of.insert(priority, next);
            }
            (false, true) => {
                self.last_of.insert(priority, prev);
            }
            (false, false) => {}
        }

        if prev == NIL {
            self.head = next;
        } else {
            self.entries[prev].next = next;
        }
        if next != NIL {
            self.entries[next].prev = prev;
        }
        self.entries[slot].prev = NIL;
        self.entries[slot].next = NIL;
        self.len -= 1;
        prev
    }

    /// Attach `slot` right after `anchor` (`NIL` = at the head) as the last
    /// entry of its bucket.
    fn link_after(&mut self, slot: usize, anchor: usize) {
        let next = if anchor == NIL {
            self.head
        } else {
            self.entries[anchor].next
        };
        self.entries[slot].prev = anchor;
        self.entries[slot].next = next;
        if anchor == NIL {
            self.head = slot;
        } else {
            self.entries[anchor].next = slot;
        }
        if next != NIL {
            self.entries[next].prev = slot;
        }

        let priority = self.entries[slot].priority;
        self.first_of.entry(priority).or_insert(slot);
        self.last_of.insert(priority, slot);
        self.len += 1;
    }
}
