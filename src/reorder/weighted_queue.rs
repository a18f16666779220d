//! Linked-list priority queue with float priorities
//!
//! Keys live in a doubly linked list ordered by descending priority. A key
//! whose priority changes is unlinked and re-inserted by walking from the
//! head, which is cheap while only a handful of keys carry a nonzero
//! priority (the situation the windowed orderings create).

use crate::types::NodeId;
use ahash::AHashMap;

const NIL: usize = usize::MAX;

#[derive(Debug, Clone)]
struct Entry {
    key: NodeId,
    priority: f32,
    left: usize,
    right: usize,
}

/// Max-priority queue over a fixed key set supporting in-place adjustment.
///
/// Among equal priorities, a key that was (re)inserted later sits behind the
/// keys already present, so `pop` returns the longest-standing one first.
#[derive(Debug, Clone)]
pub struct WeightedPriorityQueue {
    entries: Vec<Entry>,
    slots: AHashMap<NodeId, usize>,
    head: usize,
    tail: usize,
    len: usize,
}

impl WeightedPriorityQueue {
    /// Queue holding keys `0..n`, all at priority 0, in key order
    pub fn new(n: usize) -> Self {
        let keys: Vec<NodeId> = (0..n as NodeId).collect();
        Self::from_keys(&keys)
    }

    /// Queue holding `keys` at priority 0 in the given order.
    ///
    /// Repeated keys after the first occurrence are ignored.
    pub fn from_keys(keys: &[NodeId]) -> Self {
        let mut entries: Vec<Entry> = Vec::with_capacity(keys.len());
        let mut slots = AHashMap::with_capacity(keys.len());
        for &key in keys {
            if slots.contains_key(&key) {
                continue;
            }
            let slot = entries.len();
            slots.insert(key, slot);
            entries.push(Entry {
                key,
                priority: 0.0,
                left: slot.wrapping_sub(1),
                right: slot + 1,
            });
        }

        let len = entries.len();
        if let Some(first) = entries.first_mut() {
            first.left = NIL;
        }
        if let Some(last) = entries.last_mut() {
            last.right = NIL;
        }

        Self {
            entries,
            slots,
            head: if len == 0 { NIL } else { 0 },
            tail: if len == 0 { NIL } else { len - 1 },
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, key: NodeId) -> bool {
        self.slots.contains_key(&key)
    }

    /// Current priority of a queued key
    pub fn priority(&self, key: NodeId) -> Option<f32> {
        self.slots.get(&key).map(|&slot| self.entries[slot].priority)
    }

    /// Raise the priority of `key`; no-op once the key has been popped
    pub fn increment(&mut self, key: NodeId, delta: f32) {
        self.adjust(key, delta);
    }

    /// Lower the priority of `key`; no-op once the key has been popped
    pub fn decrement(&mut self, key: NodeId, delta: f32) {
        self.adjust(key, -delta);
    }

    fn adjust(&mut self, key: NodeId, delta: f32) {
        let Some(&slot) = self.slots.get(&key) else {
            return;
        };
        self.unlink(slot);
        self.entries[slot].priority += delta;
        self.link(slot);
    }

    /// Remove and return the key at the head (highest priority)
    pub fn pop(&mut self) -> Option<NodeId> {
        if self.head == NIL {
            return None;
        }
        let slot = self.head;
        self.unlink(slot);
        let key = self.entries[slot].key;
        self.slots.remove(&key);
        Some(key)
    }

    /// Queued `(key, priority)` pairs from head to tail
    pub fn ordered(&self) -> Vec<(NodeId, f32)> {
        let mut out = Vec::with_capacity(self.len);
        let mut current = self.head;
        while current != NIL {
            let entry = &self.entries[current];
            out.push((entry.key, entry.priority));
            current = entry.right;
        }
        out
    }

    fn unlink(&mut self, slot: usize) {
        let Entry { left, right, .. } = self.entries[slot];
        if left == NIL {
            self.head = right;
        } else {
            self.entries[left].right = right;
        }
        if right == NIL {
            self.tail = left;
        } else {
            self.entries[right].left = left;
        }
        self.entries[slot].left = NIL;
        self.entries[slot].right = NIL;
        self.len -= 1;
    }

    /// Insert before the first entry with a strictly lower priority
    fn link(&mut self, slot: usize) {
        let priority = self.entries[slot].priority;
        let mut current = self.head;
        while current != NIL && self.entries[current].priority >= priority {
            current = self.entries[current].right;
        }

        let left = if current == NIL {
            self.tail
        } else {
            self.entries[current].left
        };
        self.entries[slot].left = left;
        self.entries[slot].right = current;
        if left == NIL {
            self.head = slot;
        } else {
            self.entries[left].right = slot;
        }
        if current == NIL {
            self.tail = slot;
        } else {
            self.entries[current].left = slot;
        }
        self.len += 1;
    }
}
