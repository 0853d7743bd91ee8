//! Terrain geometry: the subdivided plane grid, height displacement into
//! ground orientation, normals, wireframe edges, and GPU vertex formats.

pub mod error;
pub mod grid;
pub mod lines;
pub mod terrain_mesh;
pub mod vertex_format;

pub use error::MeshError;
pub use grid::PlaneGrid;
pub use lines::{LineSet, axes_helper, light_marker, unique_edges};
pub use terrain_mesh::{TerrainMesh, rotate_to_ground};
pub use vertex_format::{
    LINE_VERTEX_ATTRIBUTES, LINE_VERTEX_LAYOUT, LineVertex, TERRAIN_VERTEX_ATTRIBUTES,
    TERRAIN_VERTEX_LAYOUT, TerrainVertex,
};
