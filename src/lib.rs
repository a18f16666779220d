//! navgraph
//!
//! Flat navigable small-world graph index for approximate nearest-neighbor
//! search, with locality-improving reordering of the node arena.
//!
//! ## Features
//! - Single-layer graph over one contiguous arena (vector + links + label)
//! - Strided entry probing and beam search
//! - Heuristic neighbor selection with back-link repair
//! - Reordering: Gorder, BCORDER, RCM (plain and two-hop), degree sorts,
//!   hub sort / hub cluster, DBG, and profile-guided Gorder / RCM
//! - Save / load of the arena with header validation
//!
//! ## Architecture
//! - `index`: node store, beam search, neighbor selection, `GraphIndex`
//! - `reorder`: pure `AdjacencyTable -> Permutation` algorithms and their queues
//! - `distance`: pluggable metrics over raw byte buffers
//! - `stats`: graph and recall statistics for tooling
//!
//! ## Example
//! ```rust,no_run
//! use navgraph::{GraphIndex, L2Space, ReorderAlgorithm};
//! use std::sync::Arc;
//!
//! # fn main() -> navgraph::Result<()> {
//! let mut index: GraphIndex = GraphIndex::new(Arc::new(L2Space::new(4)), 1_000, 16)?;
//! let v = [0.1f32, 0.2, 0.3, 0.4];
//! index.add(bytemuck::cast_slice(&v), 7, 100)?;
//! index.reorder(ReorderAlgorithm::Gorder)?;
//! let hits = index.search(bytemuck::cast_slice(&v), 1, 50)?;
//! assert_eq!(hits[0].1, 7);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod distance;
pub mod index;
pub mod reorder;
pub mod stats;
pub mod types;

mod error;

pub use config::IndexConfig;
pub use distance::{DistanceMetric, InnerProductSpace, L2Space};
pub use error::{IndexError, Result};
pub use index::{GraphIndex, VisitedMarker};
pub use reorder::{ProfileAlgorithm, ReorderAlgorithm, ReorderParams};
pub use stats::{compute_recall, IndexStats};
pub use types::{AdjacencyTable, EdgeWeights, Label, NodeId, Permutation, EMPTY_SLOT};
