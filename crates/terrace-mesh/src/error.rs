//! Geometry construction errors.

/// Errors raised while building terrain geometry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// The height field does not have one sample per grid vertex.
    #[error("height field has {actual} samples but the grid has {expected} vertices")]
    HeightCountMismatch { expected: usize, actual: usize },

    /// The grid has more vertices than a `u32` index buffer can address.
    #[error("grid of {vertices} vertices exceeds the u32 index range")]
    IndexOverflow { vertices: usize },
}
