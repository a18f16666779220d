//! Inner-product (angular) distance: `1 - <a, b>`

use super::{f32_lanes, DistanceMetric};

/// Inner-product space over `dim`-dimensional f32 vectors.
///
/// Vectors are expected to be normalized; the distance is then the
/// cosine distance.
#[derive(Debug, Clone, Copy)]
pub struct InnerProductSpace {
    dim: usize,
}

impl InnerProductSpace {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl DistanceMetric for InnerProductSpace {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn data_size(&self) -> usize {
        self.dim * std::mem::size_of::<f32>()
    }

    #[inline]
    fn distance(&self, a: &[u8], b: &[u8]) -> f32 {
        let dot: f32 = f32_lanes(a).zip(f32_lanes(b)).map(|(x, y)| x * y).sum();
        1.0 - dot
    }
}
