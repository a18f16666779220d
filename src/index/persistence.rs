//! Index save / load
//!
//! File layout: a bincode-encoded [`IndexHeader`] (five little-endian `u64`)
//! followed by the raw arena, `node_size * max_nodes` bytes. Link ids inside
//! the arena are native-endian, so files move only between machines of the
//! same byte order.

use super::graph_index::GraphIndex;
use super::store::{NodeStore, StoreLayout};
use crate::config::IndexConfig;
use crate::distance::DistanceMetric;
use crate::error::{IndexError, Result};
use crate::types::Label;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct IndexHeader {
    max_degree: u64,
    max_nodes: u64,
    len: u64,
    data_size: u64,
    node_size: u64,
}

impl From<StoreLayout> for IndexHeader {
    fn from(layout: StoreLayout) -> Self {
        Self {
            max_degree: layout.max_degree as u64,
            max_nodes: layout.max_nodes as u64,
            len: layout.len as u64,
            data_size: layout.data_size as u64,
            node_size: layout.node_size as u64,
        }
    }
}

impl IndexHeader {
    fn layout(&self) -> Result<StoreLayout> {
        let field = |value: u64, name: &str| {
            usize::try_from(value).map_err(|_| {
                IndexError::CorruptIndexFile(format!("{} {} does not fit in memory", name, value))
            })
        };
        Ok(StoreLayout {
            max_degree: field(self.max_degree, "max_degree")?,
            max_nodes: field(self.max_nodes, "max_nodes")?,
            len: field(self.len, "node count")?,
            data_size: field(self.data_size, "data_size")?,
            node_size: field(self.node_size, "node_size")?,
        })
    }
}

fn corrupt(reason: String) -> IndexError {
    tracing::warn!(%reason, "rejecting index file");
    IndexError::CorruptIndexFile(reason)
}

impl<L: Label> GraphIndex<L> {
    /// Write the header and arena to `writer`
    pub fn save<W: Write>(&self, mut writer: W) -> Result<()> {
        let header = IndexHeader::from(self.store.layout());
        bincode::serialize_into(&mut writer, &header)?;
        writer.write_all(self.store.arena())?;
        writer.flush()?;

        tracing::info!(
            nodes = header.len,
            bytes = self.store.arena().len(),
            "index saved"
        );
        Ok(())
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.save(BufWriter::new(file))
    }

    /// Read an index written by [`GraphIndex::save`].
    ///
    /// `metric` must describe the same vectors the index was built with; its
    /// data size is checked against the header. Search parameters come from
    /// [`IndexConfig`] defaults.
    pub fn load<R: Read>(metric: Arc<dyn DistanceMetric>, mut reader: R) -> Result<Self> {
        let header: IndexHeader = bincode::deserialize_from(&mut reader)
            .map_err(|e| corrupt(format!("unreadable header: {}", e)))?;
        let layout = header.layout()?;

        if layout.data_size != metric.data_size() {
            tracing::warn!(
                stored = layout.data_size,
                metric = metric.data_size(),
                "index file built for another vector size"
            );
            return Err(IndexError::DimensionMismatch {
                expected: metric.data_size(),
                actual: layout.data_size,
            });
        }

        let arena_len = layout
            .node_size
            .checked_mul(layout.max_nodes)
            .ok_or_else(|| corrupt("arena size overflows".to_string()))?;

        // Grow with the input rather than trusting the header for the allocation
        let mut arena = Vec::new();
        (&mut reader)
            .take(arena_len as u64)
            .read_to_end(&mut arena)?;
        if arena.len() != arena_len {
            return Err(corrupt(format!(
                "truncated arena: {} of {} bytes",
                arena.len(),
                arena_len
            )));
        }
        let mut probe = [0u8; 1];
        if reader.read(&mut probe)? != 0 {
            return Err(corrupt("trailing bytes after arena".to_string()));
        }

        let store = NodeStore::from_raw_parts(layout, arena).map_err(|e| match e {
            IndexError::CorruptIndexFile(reason) => corrupt(reason),
            other => other,
        })?;
        let config = IndexConfig::new(layout.max_nodes, layout.max_degree);

        tracing::info!(nodes = layout.len, capacity = layout.max_nodes, "index loaded");
        Ok(Self::from_parts(store, metric, config))
    }

    pub fn load_from_path(metric: Arc<dyn DistanceMetric>, path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::load(metric, BufReader::new(file))
    }
}
