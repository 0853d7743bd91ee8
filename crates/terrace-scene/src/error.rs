//! Session and rebuild errors.

use terrace_mesh::MeshError;
use terrace_terrain::TerrainError;

use crate::backend::BackendError;

/// Errors surfaced by [`TerrainSession`](crate::TerrainSession) operations.
///
/// Whatever the variant, the scene still shows the last successfully built
/// terrain.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A parameter command could not be interpreted.
    #[error("invalid parameter command: {0}")]
    Terrain(#[from] TerrainError),

    /// Geometry could not be built from the height field.
    #[error("failed to build terrain geometry: {0}")]
    Mesh(#[from] MeshError),

    /// The render backend refused a resource.
    #[error("render backend error: {0}")]
    Backend(#[from] BackendError),
}
