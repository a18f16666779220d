//! Distance metrics for vector similarity computation
//!
//! The index treats vectors as opaque fixed-size byte buffers; a metric knows
//! how many bytes one vector occupies and how to compare two of them.

pub mod euclidean;
pub mod inner_product;

pub use euclidean::L2Space;
pub use inner_product::InnerProductSpace;

/// Distance capability injected into the index
pub trait DistanceMetric: Send + Sync {
    /// Number of scalar components per vector
    fn dimension(&self) -> usize;

    /// Size in bytes of one vector
    fn data_size(&self) -> usize;

    /// Compute distance between two vectors of `data_size()` bytes each
    fn distance(&self, a: &[u8], b: &[u8]) -> f32;
}

/// Decodes native-endian f32 lanes from an unaligned byte buffer
#[inline]
pub(crate) fn f32_lanes(bytes: &[u8]) -> impl Iterator<Item = f32> + '_ {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
}
