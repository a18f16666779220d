//! Index configuration parameters
//!
//! Build/search widths and reordering constants, serializable to JSON so a
//! tuned setup can be stored next to a saved index.

use crate::error::{IndexError, Result};
use crate::types::{NodeId, EMPTY_SLOT};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Graph index configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Maximum out-degree per node (M)
    pub max_degree: usize,

    /// Capacity of the node arena
    pub max_nodes: usize,

    /// Beam width used while inserting
    pub ef_construction: usize,

    /// Beam width used while querying
    pub ef_search: usize,

    /// Number of strided probes used to pick the entry node
    #[serde(default = "default_n_initializations")]
    pub n_initializations: usize,

    /// Sliding window width for Gorder / BCORDER
    #[serde(default = "default_gorder_window")]
    pub gorder_window: usize,

    /// Number of in-degree groups for DBG
    #[serde(default = "default_dbg_groups")]
    pub dbg_groups: usize,
}

fn default_n_initializations() -> usize {
    100
}

fn default_gorder_window() -> usize {
    5
}

fn default_dbg_groups() -> usize {
    8
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_degree: 16,
            max_nodes: 100_000,
            ef_construction: 100,
            ef_search: 100,
            n_initializations: default_n_initializations(),
            gorder_window: default_gorder_window(),
            dbg_groups: default_dbg_groups(),
        }
    }
}

impl IndexConfig {
    /// Create a configuration with default widths
    pub fn new(max_nodes: usize, max_degree: usize) -> Self {
        Self {
            max_degree,
            max_nodes,
            ..Self::default()
        }
    }

    /// Smaller graph, narrower beams
    pub fn compact(max_nodes: usize) -> Self {
        Self {
            max_degree: 8,
            max_nodes,
            ef_construction: 64,
            ef_search: 32,
            ..Self::default()
        }
    }

    /// Denser graph, wider beams
    pub fn high_recall(max_nodes: usize) -> Self {
        Self {
            max_degree: 32,
            max_nodes,
            ef_construction: 200,
            ef_search: 200,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_degree == 0 {
            return Err(IndexError::InvalidArgument(
                "max_degree must be at least 1".to_string(),
            ));
        }
        if self.max_degree.checked_mul(std::mem::size_of::<NodeId>()).is_none() {
            return Err(IndexError::InvalidArgument(format!(
                "max_degree {} overflows the link table",
                self.max_degree
            )));
        }
        if self.max_nodes >= EMPTY_SLOT as usize {
            return Err(IndexError::InvalidArgument(format!(
                "max_nodes {} exceeds the addressable node range",
                self.max_nodes
            )));
        }
        if self.ef_construction == 0 || self.ef_search == 0 {
            return Err(IndexError::InvalidArgument(
                "beam widths must be at least 1".to_string(),
            ));
        }
        if self.n_initializations == 0 {
            return Err(IndexError::InvalidArgument(
                "n_initializations must be at least 1".to_string(),
            ));
        }
        if self.dbg_groups == 0 {
            return Err(IndexError::InvalidArgument(
                "dbg_groups must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.n_initializations, 100);
        assert_eq!(config.gorder_window, 5);
        assert_eq!(config.dbg_groups, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert!(IndexConfig::compact(10).max_degree < IndexConfig::high_recall(10).max_degree);
        assert_eq!(IndexConfig::new(50, 12).max_degree, 12);
    }

    #[test]
    fn test_validate_rejects_zero_degree() {
        let config = IndexConfig::new(10, 0);
        assert!(matches!(config.validate(), Err(IndexError::InvalidArgument(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_degree() {
        let config = IndexConfig::new(10, usize::MAX / 2);
        assert!(matches!(config.validate(), Err(IndexError::InvalidArgument(_))));
    }

    #[test]
    fn test_json_defaults_fill_missing_fields() {
        let json = r#"{"max_degree": 8, "max_nodes": 1000, "ef_construction": 40, "ef_search": 20}"#;
        let config = IndexConfig::from_json_str(json).unwrap();
        assert_eq!(config.max_degree, 8);
        assert_eq!(config.n_initializations, 100);
        assert_eq!(config.gorder_window, 5);
    }

    #[test]
    fn test_json_round_trip() {
        let config = IndexConfig::high_recall(500);
        let text = config.to_json_string().unwrap();
        assert_eq!(IndexConfig::from_json_str(&text).unwrap(), config);
    }
}
