//! Error types for the navgraph index

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Index is full ({max_nodes} nodes)")]
    CapacityExceeded { max_nodes: usize },

    #[error("Dimension mismatch: expected {expected} bytes, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Unknown reorder algorithm: {0}")]
    UnknownReorderAlgorithm(String),

    #[error("Corrupt index file: {0}")]
    CorruptIndexFile(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<bincode::Error> for IndexError {
    fn from(err: bincode::Error) -> Self {
        IndexError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        IndexError::Serialization(err.to_string())
    }
}
