//! Graph reordering
//!
//! Every algorithm is a pure function from an outbound [`AdjacencyTable`]
//! to a [`Permutation`] (`perm[old_id] = new_id`). [`ReorderAlgorithm`] and
//! [`ProfileAlgorithm`] select one by tag; `GraphIndex::reorder` applies the
//! result to the node arena.

pub mod degree;
pub mod gorder;
pub mod gorder_queue;
pub mod rcm;
pub mod weighted_queue;

pub use degree::{dbg_order, hubcluster_order, hubsort_order, indegree_order, outdegree_order};
pub use gorder::{bc_order, g_order, weighted_g_order};
pub use gorder_queue::GorderPriorityQueue;
pub use rcm::{rcm_order, rcm_order_2hop, weighted_rcm_order};
pub use weighted_queue::WeightedPriorityQueue;

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::types::{AdjacencyTable, EdgeWeights, NodeId, Permutation};
use std::fmt;
use std::str::FromStr;

/// Structural reordering strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReorderAlgorithm {
    /// Windowed greedy locality ordering
    Gorder,
    /// Descending in-degree
    InDegree,
    /// Descending out-degree
    OutDegree,
    /// Reverse Cuthill-McKee
    Rcm,
    /// Reverse Cuthill-McKee over the two-hop closure
    Rcm2Hop,
    /// Hubs sorted by degree, then the rest
    HubSort,
    /// Hubs in id order, then the rest
    HubCluster,
    /// Degree-based grouping
    Dbg,
    /// Gorder with shared-parent correction
    BcOrder,
}

impl ReorderAlgorithm {
    pub const ALL: [ReorderAlgorithm; 9] = [
        ReorderAlgorithm::Gorder,
        ReorderAlgorithm::InDegree,
        ReorderAlgorithm::OutDegree,
        ReorderAlgorithm::Rcm,
        ReorderAlgorithm::Rcm2Hop,
        ReorderAlgorithm::HubSort,
        ReorderAlgorithm::HubCluster,
        ReorderAlgorithm::Dbg,
        ReorderAlgorithm::BcOrder,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReorderAlgorithm::Gorder => "gorder",
            ReorderAlgorithm::InDegree => "in_deg",
            ReorderAlgorithm::OutDegree => "out_deg",
            ReorderAlgorithm::Rcm => "rcm",
            ReorderAlgorithm::Rcm2Hop => "rcm_2hop",
            ReorderAlgorithm::HubSort => "hub_sort",
            ReorderAlgorithm::HubCluster => "hub_cluster",
            ReorderAlgorithm::Dbg => "dbg",
            ReorderAlgorithm::BcOrder => "bcorder",
        }
    }

    /// Compute the relabeling for `table`
    pub fn permutation(&self, table: &AdjacencyTable, params: &ReorderParams) -> Permutation {
        match self {
            ReorderAlgorithm::Gorder => g_order(table, params.window),
            ReorderAlgorithm::InDegree => indegree_order(table),
            ReorderAlgorithm::OutDegree => outdegree_order(table),
            ReorderAlgorithm::Rcm => rcm_order(table),
            ReorderAlgorithm::Rcm2Hop => rcm_order_2hop(table),
            ReorderAlgorithm::HubSort => hubsort_order(table),
            ReorderAlgorithm::HubCluster => hubcluster_order(table),
            ReorderAlgorithm::Dbg => dbg_order(table, params.dbg_groups),
            ReorderAlgorithm::BcOrder => bc_order(table, params.window),
        }
    }
}

impl fmt::Display for ReorderAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReorderAlgorithm {
    type Err = IndexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| IndexError::UnknownReorderAlgorithm(s.to_string()))
    }
}

/// Reordering strategies driven by traversal profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileAlgorithm {
    /// Gorder with edge-weighted raises
    Gorder,
    /// RCM ranked by weighted degree
    Rcm,
}

impl ProfileAlgorithm {
    pub const ALL: [ProfileAlgorithm; 2] = [ProfileAlgorithm::Gorder, ProfileAlgorithm::Rcm];

    pub fn name(&self) -> &'static str {
        match self {
            ProfileAlgorithm::Gorder => "gorder",
            ProfileAlgorithm::Rcm => "rcm",
        }
    }

    /// Compute the relabeling for `table` weighted by `weights`.
    ///
    /// Fails with `InvalidArgument` unless `weights` has the shape of `table`.
    pub fn permutation(&self, table: &AdjacencyTable, weights: &EdgeWeights, window: usize) -> Result<Permutation> {
        match self {
            ProfileAlgorithm::Gorder => weighted_g_order(table, weights, window),
            ProfileAlgorithm::Rcm => weighted_rcm_order(table, weights),
        }
    }
}

impl fmt::Display for ProfileAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProfileAlgorithm {
    type Err = IndexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| IndexError::UnknownReorderAlgorithm(s.to_string()))
    }
}

/// Tuning constants shared by the windowed and grouped orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderParams {
    /// Gorder / BCORDER window width
    pub window: usize,
    /// DBG group count
    pub dbg_groups: usize,
}

impl Default for ReorderParams {
    fn default() -> Self {
        Self {
            window: 5,
            dbg_groups: 8,
        }
    }
}

impl From<&IndexConfig> for ReorderParams {
    fn from(config: &IndexConfig) -> Self {
        Self {
            window: config.gorder_window,
            dbg_groups: config.dbg_groups,
        }
    }
}

/// Inbound adjacency: `result[v]` lists every `u` with an edge `u -> v`,
/// in ascending `u`
pub fn transpose(table: &AdjacencyTable) -> AdjacencyTable {
    let mut inbound = vec![Vec::new(); table.len()];
    for (node, row) in table.iter().enumerate() {
        for &target in row {
            inbound[target as usize].push(node as NodeId);
        }
    }
    inbound
}

pub fn in_degrees(table: &AdjacencyTable) -> Vec<usize> {
    let mut degrees = vec![0usize; table.len()];
    for &target in table.iter().flatten() {
        degrees[target as usize] += 1;
    }
    degrees
}

/// Checks that `weights` has one entry per edge of `table`, row by row
pub fn check_weights(table: &AdjacencyTable, weights: &EdgeWeights) -> Result<()> {
    if weights.len() != table.len() {
        return Err(IndexError::InvalidArgument(format!(
            "{} weight rows for {} nodes",
            weights.len(),
            table.len()
        )));
    }
    if let Some(node) = (0..table.len()).find(|&i| weights[i].len() != table[i].len()) {
        return Err(IndexError::InvalidArgument(format!(
            "node {} has {} edges but {} weights",
            node,
            table[node].len(),
            weights[node].len()
        )));
    }
    Ok(())
}

/// The table as it reads after relabeling with `perm`
pub fn apply_permutation(table: &AdjacencyTable, perm: &[NodeId]) -> AdjacencyTable {
    let mut relabeled = vec![Vec::new(); table.len()];
    for (old, row) in table.iter().enumerate() {
        relabeled[perm[old] as usize] = row.iter().map(|&t| perm[t as usize]).collect();
    }
    relabeled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::is_permutation;
    use proptest::prelude::*;

    #[test]
    fn test_algorithm_names_round_trip() {
        for algorithm in ReorderAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<ReorderAlgorithm>().unwrap(), algorithm);
        }
        for algorithm in ProfileAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<ProfileAlgorithm>().unwrap(), algorithm);
        }
        assert_eq!("RCM_2HOP".parse::<ReorderAlgorithm>().unwrap(), ReorderAlgorithm::Rcm2Hop);
        assert_eq!(" Gorder ".parse::<ProfileAlgorithm>().unwrap(), ProfileAlgorithm::Gorder);
    }

    #[test]
    fn test_unknown_algorithm() {
        assert!(matches!(
            "metis".parse::<ReorderAlgorithm>(),
            Err(IndexError::UnknownReorderAlgorithm(name)) if name == "metis"
        ));
        assert!(matches!(
            "dbg".parse::<ProfileAlgorithm>(),
            Err(IndexError::UnknownReorderAlgorithm(_))
        ));
    }

    #[test]
    fn test_transpose_and_degrees() {
        let table = vec![vec![1, 2], vec![2], vec![]];
        assert_eq!(transpose(&table), vec![vec![], vec![0], vec![0, 1]]);
        assert_eq!(in_degrees(&table), vec![0, 1, 2]);
    }

    #[test]
    fn test_weights_must_match_table_shape() {
        let table = vec![vec![1, 2], vec![0], vec![]];
        assert!(check_weights(&table, &vec![vec![1.0, 1.0], vec![2.0], vec![]]).is_ok());

        let short_row = vec![vec![1.0], vec![2.0], vec![]];
        let missing_row = vec![vec![1.0, 1.0], vec![2.0]];
        for weights in [short_row, missing_row] {
            assert!(matches!(check_weights(&table, &weights), Err(IndexError::InvalidArgument(_))));
            for algorithm in ProfileAlgorithm::ALL {
                assert!(matches!(
                    algorithm.permutation(&table, &weights, 5),
                    Err(IndexError::InvalidArgument(_))
                ));
            }
        }
    }

    #[test]
    fn test_apply_permutation() {
        let table = vec![vec![1], vec![2], vec![]];
        // reverse the ids
        let relabeled = apply_permutation(&table, &[2, 1, 0]);
        assert_eq!(relabeled, vec![vec![], vec![0], vec![1]]);
    }

    #[test]
    fn test_reordering_a_reordered_graph() {
        let table: AdjacencyTable = (0..20u32).map(|i| vec![(i + 1) % 20, (i + 7) % 20]).collect();
        for algorithm in ReorderAlgorithm::ALL {
            let params = ReorderParams::default();
            let once = apply_permutation(&table, &algorithm.permutation(&table, &params));
            let again = algorithm.permutation(&once, &params);
            assert!(is_permutation(&again), "{}", algorithm);
            assert_eq!(again.len(), 20);
        }
    }

    fn graph_strategy() -> impl Strategy<Value = AdjacencyTable> {
        (0usize..40).prop_flat_map(|n| {
            let row = prop::collection::vec(0..n.max(1) as NodeId, 0..6);
            prop::collection::vec(row, n).prop_map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(node, mut row)| {
                        row.retain(|&t| t != node as NodeId);
                        row.sort_unstable();
                        row.dedup();
                        row
                    })
                    .collect()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_every_algorithm_is_a_bijection(table in graph_strategy(), window in 0usize..8, groups in 1usize..10) {
            let params = ReorderParams { window, dbg_groups: groups };
            for algorithm in ReorderAlgorithm::ALL {
                let perm = algorithm.permutation(&table, &params);
                prop_assert_eq!(perm.len(), table.len());
                prop_assert!(is_permutation(&perm), "{} is not a bijection", algorithm);
            }
        }

        #[test]
        fn prop_profile_algorithms_are_bijections(table in graph_strategy(), seed in 0u32..100) {
            let weights: EdgeWeights = table
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    row.iter()
                        .enumerate()
                        .map(|(j, _)| 1.0 + ((i as u32 * 31 + j as u32 * 17 + seed) % 7) as f32)
                        .collect()
                })
                .collect();
            for algorithm in ProfileAlgorithm::ALL {
                let perm = algorithm.permutation(&table, &weights, 5).unwrap();
                prop_assert!(is_permutation(&perm), "{} is not a bijection", algorithm);
            }
        }
    }
}
