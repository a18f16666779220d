//! Core identifiers and table types shared by the index and the reordering algorithms

use bytemuck::Pod;

/// Internal node identifier (position of the node record in the arena)
pub type NodeId = u32;

/// Marker stored in an adjacency slot that holds no neighbor.
///
/// Never a valid node id: `max_nodes` is always strictly below it.
pub const EMPTY_SLOT: NodeId = NodeId::MAX;

/// Outbound neighbor lists, one per node, empty slots excluded
pub type AdjacencyTable = Vec<Vec<NodeId>>;

/// Edge weights laid out exactly like an [`AdjacencyTable`]:
/// `weights[i][j]` is the weight of the edge `i -> table[i][j]`
pub type EdgeWeights = Vec<Vec<f32>>;

/// Relabeling permutation: `perm[old_id]` is the new id of node `old_id`
pub type Permutation = Vec<NodeId>;

/// User-supplied fixed-size identifier attached to every node.
///
/// Any plain-old-data type works; labels are copied byte-for-byte into the
/// arena and read back unaligned.
pub trait Label: Pod + Send + Sync {}

impl<T: Pod + Send + Sync> Label for T {}

/// Inverts an ordering (`order[new_id] = old_id`) into a [`Permutation`].
pub fn order_to_permutation(order: &[NodeId]) -> Permutation {
    let mut perm = vec![0 as NodeId; order.len()];
    for (new_id, &old_id) in order.iter().enumerate() {
        perm[old_id as usize] = new_id as NodeId;
    }
    perm
}

/// Checks that `perm` is a bijection on `[0, perm.len())`.
pub fn is_permutation(perm: &[NodeId]) -> bool {
    let mut seen = vec![false; perm.len()];
    for &p in perm {
        let p = p as usize;
        if p >= perm.len() || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}
