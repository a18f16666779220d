//! Index layer implementation
//!
//! - `store`: fixed-stride node arena (vector, links, label)
//! - `search`: entry probing and beam search
//! - `pruner`: neighbor selection
//! - `graph_index`: insertion, queries and reordering entry points
//! - `persistence`: save / load

mod graph_index;
pub mod heap;
mod persistence;
pub mod pruner;
pub mod search;
pub mod store;
pub mod visited;

pub use graph_index::GraphIndex;
pub use heap::{Candidate, DistanceQueue};
pub use pruner::{diversify, nearest_prune, select_neighbors};
pub use search::{beam_search, search_initialization};
pub use store::{Links, LinksMut, NodeStore, StoreLayout};
pub use visited::VisitedMarker;
