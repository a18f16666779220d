//! Flat node arena
//!
//! Layout: one contiguous byte buffer sized for `max_nodes` records.
//! Each record (stride `node_size`):
//!   data:  [u8; data_size]
//!   links: [NodeId; max_degree]   (native endian, EMPTY_SLOT = no neighbor)
//!   label: [u8; size_of::<L>()]
//!
//! A node is addressed by its position in the arena; nothing hands out raw
//! addresses, so relabeling cannot leave dangling references behind.

use crate::error::{IndexError, Result};
use crate::types::{is_permutation, AdjacencyTable, Label, NodeId, EMPTY_SLOT};
use std::marker::PhantomData;
use std::mem::size_of;

const LINK_SIZE: usize = size_of::<NodeId>();

#[inline]
fn read_link(bytes: &[u8], slot: usize) -> NodeId {
    let start = slot * LINK_SIZE;
    NodeId::from_ne_bytes([
        bytes[start],
        bytes[start + 1],
        bytes[start + 2],
        bytes[start + 3],
    ])
}

/// Read-only view over the `max_degree` adjacency slots of one node
#[derive(Clone, Copy)]
pub struct Links<'a> {
    bytes: &'a [u8],
}

impl<'a> Links<'a> {
    pub fn len(&self) -> usize {
        self.bytes.len() / LINK_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw slot value, possibly [`EMPTY_SLOT`]
    #[inline]
    pub fn get(&self, slot: usize) -> NodeId {
        read_link(self.bytes, slot)
    }

    /// Every slot, empty ones included
    pub fn slots(&self) -> impl Iterator<Item = NodeId> + 'a {
        let bytes = self.bytes;
        (0..bytes.len() / LINK_SIZE).map(move |slot| read_link(bytes, slot))
    }

    /// Occupied slots only
    pub fn neighbors(&self) -> impl Iterator<Item = NodeId> + 'a {
        self.slots().filter(|&id| id != EMPTY_SLOT)
    }

    pub fn degree(&self) -> usize {
        self.neighbors().count()
    }
}

/// Mutable view over the adjacency slots of one node
pub struct LinksMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> LinksMut<'a> {
    pub fn len(&self) -> usize {
        self.bytes.len() / LINK_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn get(&self, slot: usize) -> NodeId {
        read_link(self.bytes, slot)
    }

    #[inline]
    pub fn set(&mut self, slot: usize, id: NodeId) {
        let start = slot * LINK_SIZE;
        self.bytes[start..start + LINK_SIZE].copy_from_slice(&id.to_ne_bytes());
    }

    /// Mark every slot empty
    pub fn clear(&mut self) {
        for slot in 0..self.len() {
            self.set(slot, EMPTY_SLOT);
        }
    }

    /// Overwrite the list with `ids`; remaining slots become empty.
    ///
    /// # Panics
    /// Panics if `ids` is longer than the slot count
    pub fn assign(&mut self, ids: &[NodeId]) {
        assert!(ids.len() <= self.len(), "more neighbors than slots");
        for (slot, &id) in ids.iter().enumerate() {
            self.set(slot, id);
        }
        for slot in ids.len()..self.len() {
            self.set(slot, EMPTY_SLOT);
        }
    }

    pub fn first_empty(&self) -> Option<usize> {
        (0..self.len()).find(|&slot| self.get(slot) == EMPTY_SLOT)
    }

    pub fn as_links(&self) -> Links<'_> {
        Links { bytes: self.bytes }
    }
}

/// Header fields describing an arena; persisted ahead of the raw bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLayout {
    pub max_degree: usize,
    pub max_nodes: usize,
    pub len: usize,
    pub data_size: usize,
    pub node_size: usize,
}

/// Fixed-stride node arena
pub struct NodeStore<L: Label> {
    max_degree: usize,
    max_nodes: usize,
    len: usize,
    data_size: usize,
    node_size: usize,
    arena: Vec<u8>,
    _label: PhantomData<L>,
}

impl<L: Label> NodeStore<L> {
    /// Allocate an arena for `max_nodes` records.
    ///
    /// Fails with `InvalidArgument` when the record or arena size does not
    /// fit in `usize`.
    pub fn new(data_size: usize, max_degree: usize, max_nodes: usize) -> Result<Self> {
        let too_large = || {
            IndexError::InvalidArgument(format!(
                "{} nodes of {} bytes with {} links do not fit in memory",
                max_nodes, data_size, max_degree
            ))
        };
        let node_size = Self::node_size_for(data_size, max_degree).ok_or_else(too_large)?;
        let arena_len = node_size.checked_mul(max_nodes).ok_or_else(too_large)?;
        Ok(Self {
            max_degree,
            max_nodes,
            len: 0,
            data_size,
            node_size,
            arena: vec![0u8; arena_len],
            _label: PhantomData,
        })
    }

    /// Record stride for the given vector size and degree, `None` on overflow
    pub fn node_size_for(data_size: usize, max_degree: usize) -> Option<usize> {
        max_degree
            .checked_mul(LINK_SIZE)?
            .checked_add(data_size)?
            .checked_add(size_of::<L>())
    }

    /// Rebuild a store from persisted parts, validating every field
    pub fn from_raw_parts(layout: StoreLayout, arena: Vec<u8>) -> Result<Self> {
        let expected_node_size = Self::node_size_for(layout.data_size, layout.max_degree)
            .ok_or_else(|| {
                IndexError::CorruptIndexFile(format!(
                    "record of {} data bytes and {} links overflows",
                    layout.data_size, layout.max_degree
                ))
            })?;
        if layout.node_size != expected_node_size {
            return Err(IndexError::CorruptIndexFile(format!(
                "node size {} does not match data size {} + {} links + label ({} expected)",
                layout.node_size, layout.data_size, layout.max_degree, expected_node_size
            )));
        }
        if layout.len > layout.max_nodes {
            return Err(IndexError::CorruptIndexFile(format!(
                "node count {} exceeds capacity {}",
                layout.len, layout.max_nodes
            )));
        }
        if layout.max_nodes >= EMPTY_SLOT as usize {
            return Err(IndexError::CorruptIndexFile(format!(
                "capacity {} exceeds the addressable node range",
                layout.max_nodes
            )));
        }
        let expected_len = layout.node_size.checked_mul(layout.max_nodes).ok_or_else(|| {
            IndexError::CorruptIndexFile("arena size overflows".to_string())
        })?;
        if arena.len() != expected_len {
            return Err(IndexError::CorruptIndexFile(format!(
                "arena holds {} bytes, header declares {}",
                arena.len(),
                expected_len
            )));
        }

        let store = Self {
            max_degree: layout.max_degree,
            max_nodes: layout.max_nodes,
            len: layout.len,
            data_size: layout.data_size,
            node_size: layout.node_size,
            arena,
            _label: PhantomData,
        };

        for id in 0..store.len as NodeId {
            if let Some(bad) = store
                .links(id)
                .neighbors()
                .find(|&n| n as usize >= store.len)
            {
                return Err(IndexError::CorruptIndexFile(format!(
                    "node {} links to out-of-range node {}",
                    id, bad
                )));
            }
        }

        Ok(store)
    }

    pub fn layout(&self) -> StoreLayout {
        StoreLayout {
            max_degree: self.max_degree,
            max_nodes: self.max_nodes,
            len: self.len,
            data_size: self.data_size,
            node_size: self.node_size,
        }
    }

    /// Raw arena, `node_size * max_nodes` bytes
    pub fn arena(&self) -> &[u8] {
        &self.arena
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.max_nodes
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    pub fn data_size(&self) -> usize {
        self.data_size
    }

    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Append a node with all slots empty.
    ///
    /// Fails without touching the arena when `data` has the wrong size or the
    /// arena is full.
    pub fn allocate(&mut self, data: &[u8], label: L) -> Result<NodeId> {
        if data.len() != self.data_size {
            return Err(IndexError::DimensionMismatch {
                expected: self.data_size,
                actual: data.len(),
            });
        }
        if self.is_full() {
            return Err(IndexError::CapacityExceeded {
                max_nodes: self.max_nodes,
            });
        }

        let id = self.len as NodeId;
        self.len += 1;

        let data_size = self.data_size;
        let links_end = data_size + self.max_degree * LINK_SIZE;
        let record = self.record_mut(id);
        record[..data_size].copy_from_slice(data);
        record[links_end..].copy_from_slice(bytemuck::bytes_of(&label));
        self.links_mut(id).clear();

        Ok(id)
    }

    #[inline]
    fn record(&self, id: NodeId) -> &[u8] {
        debug_assert!((id as usize) < self.len, "node {} out of range", id);
        let start = id as usize * self.node_size;
        &self.arena[start..start + self.node_size]
    }

    #[inline]
    fn record_mut(&mut self, id: NodeId) -> &mut [u8] {
        debug_assert!((id as usize) < self.len, "node {} out of range", id);
        let start = id as usize * self.node_size;
        &mut self.arena[start..start + self.node_size]
    }

    /// Vector bytes of node `id`. Caller guarantees `id < len()`.
    #[inline]
    pub fn data(&self, id: NodeId) -> &[u8] {
        &self.record(id)[..self.data_size]
    }

    #[inline]
    pub fn links(&self, id: NodeId) -> Links<'_> {
        let (start, end) = (self.data_size, self.data_size + self.max_degree * LINK_SIZE);
        Links {
            bytes: &self.record(id)[start..end],
        }
    }

    #[inline]
    pub fn links_mut(&mut self, id: NodeId) -> LinksMut<'_> {
        let (start, end) = (self.data_size, self.data_size + self.max_degree * LINK_SIZE);
        LinksMut {
            bytes: &mut self.record_mut(id)[start..end],
        }
    }

    pub fn label(&self, id: NodeId) -> L {
        let start = self.data_size + self.max_degree * LINK_SIZE;
        bytemuck::pod_read_unaligned(&self.record(id)[start..])
    }

    /// Outbound neighbor lists, empty slots excluded
    pub fn adjacency_table(&self) -> AdjacencyTable {
        (0..self.len as NodeId)
            .map(|id| self.links(id).neighbors().collect())
            .collect()
    }

    /// Apply a relabeling in place: node `i` becomes node `perm[i]`.
    ///
    /// Links are rewritten first, then records are moved along the cycles of
    /// the permutation with pairwise swaps, so the only extra memory is the
    /// relocation bitmap.
    pub fn relabel(&mut self, perm: &[NodeId]) -> Result<()> {
        if perm.len() != self.len || !is_permutation(perm) {
            return Err(IndexError::InvalidArgument(format!(
                "relabel needs a permutation of {} nodes",
                self.len
            )));
        }

        for id in 0..self.len as NodeId {
            let mut links = self.links_mut(id);
            for slot in 0..links.len() {
                let target = links.get(slot);
                if target != EMPTY_SLOT {
                    links.set(slot, perm[target as usize]);
                }
            }
        }

        let mut relocated = vec![false; self.len];
        for start in 0..self.len {
            if relocated[start] {
                continue;
            }
            // `start` is used as the staging slot: each swap parks the
            // displaced record there until the cycle closes.
            relocated[start] = true;
            let mut dest = perm[start] as usize;
            self.swap_records(start, dest);
            while !relocated[dest] {
                relocated[dest] = true;
                dest = perm[dest] as usize;
                self.swap_records(start, dest);
            }
        }

        Ok(())
    }

    fn swap_records(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let ns = self.node_size;
        let (left, right) = self.arena.split_at_mut(hi * ns);
        left[lo * ns..(lo + 1) * ns].swap_with_slice(&mut right[..ns]);
    }
}
