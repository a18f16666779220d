//! Squared Euclidean distance over native-endian f32 byte buffers

use super::{f32_lanes, DistanceMetric};

/// Squared Euclidean distance on raw bytes, without decoding into a vector
#[inline]
fn euclidean_bytes(a: &[u8], b: &[u8]) -> f32 {
    f32_lanes(a)
        .zip(f32_lanes(b))
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

/// L2 space: squared Euclidean distance between `dim`-dimensional f32 vectors
#[derive(Debug, Clone, Copy)]
pub struct L2Space {
    dim: usize,
}

impl L2Space {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl DistanceMetric for L2Space {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn data_size(&self) -> usize {
        self.dim * std::mem::size_of::<f32>()
    }

    #[inline]
    fn distance(&self, a: &[u8], b: &[u8]) -> f32 {
        euclidean_bytes(a, b)
    }
}
