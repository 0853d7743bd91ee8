//! Displaced terrain geometry in ground orientation, with normals.

use glam::Vec3;

use crate::error::MeshError;
use crate::grid::PlaneGrid;
use crate::lines::{LineSet, unique_edges};
use crate::vertex_format::TerrainVertex;

/// Rotate a point by `-pi/2` about the X axis: `(x, y, z) -> (x, z, -y)`.
///
/// Takes the plane from the XY plane (height along +Z) to the XZ ground
/// plane (height along +Y). Written as a component swap so the result is
/// exact.
#[inline]
pub fn rotate_to_ground(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

/// Indexed triangle mesh of a displaced plane grid.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    face_normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl TerrainMesh {
    /// Displace `grid` by one height per vertex (in grid index order), rotate
    /// into ground orientation, and compute face and vertex normals.
    pub fn build(grid: &PlaneGrid, heights: &[f64]) -> Result<Self, MeshError> {
        let expected = grid.vertex_count();
        if heights.len() != expected {
            return Err(MeshError::HeightCountMismatch {
                expected,
                actual: heights.len(),
            });
        }
        let indices = grid.triangle_indices()?;

        let positions: Vec<Vec3> = grid
            .planar_positions()
            .iter()
            .zip(heights)
            .map(|(p, h)| rotate_to_ground(Vec3::new(p.x as f32, p.y as f32, *h as f32)))
            .collect();

        let face_normals = compute_face_normals(&positions, &indices);
        let normals = compute_vertex_normals(&positions, &indices);

        Ok(Self {
            positions,
            normals,
            face_normals,
            indices,
        })
    }

    /// Vertex positions in ground orientation.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Unit vertex normals (area-weighted average of adjacent faces).
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Unit normal of each triangle.
    pub fn face_normals(&self) -> &[Vec3] {
        &self.face_normals
    }

    /// Triangle list indices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaved GPU vertices.
    pub fn to_vertices(&self) -> Vec<TerrainVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| TerrainVertex::new(*p, *n))
            .collect()
    }

    /// One line segment per unique triangle edge, all in `color`.
    pub fn wireframe(&self, color: [f32; 4]) -> LineSet {
        let mut lines = LineSet::new();
        for (a, b) in unique_edges(&self.indices) {
            lines.push_segment(self.positions[a as usize], self.positions[b as usize], color);
        }
        lines
    }
}

/// Normalized cross product of each triangle's edges.
fn compute_face_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    indices
        .chunks_exact(3)
        .map(|tri| triangle_cross(positions, tri).normalize_or_zero())
        .collect()
}

/// Sum the unnormalized face cross products into each corner, then normalize.
fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let n = triangle_cross(positions, tri);
        for &i in tri {
            normals[i as usize] += n;
        }
    }
    for n in &mut normals {
        *n = n.normalize_or_zero();
    }
    normals
}

fn triangle_cross(positions: &[Vec3], tri: &[u32]) -> Vec3 {
    let a = positions[tri[0] as usize];
    let b = positions[tri[1] as usize];
    let c = positions[tri[2] as usize];
    (b - a).cross(c - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_rotation_maps_plane_normal_to_up() {
        assert_eq!(rotate_to_ground(Vec3::Z), Vec3::Y);
        assert_eq!(rotate_to_ground(Vec3::Y), Vec3::NEG_Z);
        assert_eq!(rotate_to_ground(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_height_lands_on_y() {
        let grid = PlaneGrid::new(2.0, 2.0, 1, 1);
        let mesh = TerrainMesh::build(&grid, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let ys: Vec<f32> = mesh.positions().iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![1.0, 2.0, 3.0, 4.0]);
        // Top row of the plane (y = +1) ends up at z = -1.
        assert_eq!(mesh.positions()[0], Vec3::new(-1.0, 1.0, -1.0));
    }

    #[test]
    fn test_flat_grid_normals_point_up() {
        let grid = PlaneGrid::new(10.0, 10.0, 4, 4);
        let mesh = TerrainMesh::build(&grid, &vec![3.0; grid.vertex_count()]).unwrap();
        for n in mesh.normals().iter().chain(mesh.face_normals()) {
            assert!((*n - Vec3::Y).length() < EPSILON, "normal {n} is not +Y");
        }
    }

    #[test]
    fn test_vertex_normals_are_unit_length() {
        let grid = PlaneGrid::new(10.0, 10.0, 5, 5);
        let heights: Vec<f64> = (0..grid.vertex_count()).map(|i| (i % 7) as f64).collect();
        let mesh = TerrainMesh::build(&grid, &heights).unwrap();
        for n in mesh.normals() {
            assert!((n.length() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_slope_tilts_normal_away_from_rise() {
        // Height increases with x, so normals lean toward -X.
        let grid = PlaneGrid::new(2.0, 2.0, 2, 2);
        let heights: Vec<f64> = grid.planar_positions().iter().map(|p| p.x).collect();
        let mesh = TerrainMesh::build(&grid, &heights).unwrap();
        for n in mesh.face_normals() {
            assert!(n.x < 0.0 && n.y > 0.0);
        }
    }

    #[test]
    fn test_height_count_mismatch() {
        let grid = PlaneGrid::new(2.0, 2.0, 1, 1);
        let err = TerrainMesh::build(&grid, &[0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            MeshError::HeightCountMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_wireframe_has_one_segment_per_unique_edge() {
        let grid = PlaneGrid::new(2.0, 2.0, 3, 2);
        let mesh = TerrainMesh::build(&grid, &vec![0.0; grid.vertex_count()]).unwrap();
        let lines = mesh.wireframe([1.0; 4]);
        // Horizontal + vertical + one diagonal per cell.
        let expected = 3 * 3 + 2 * 4 + 3 * 2;
        assert_eq!(lines.segment_count(), expected);
    }

    #[test]
    fn test_to_vertices_interleaves() {
        let grid = PlaneGrid::new(2.0, 2.0, 1, 1);
        let mesh = TerrainMesh::build(&grid, &[0.0; 4]).unwrap();
        let verts = mesh.to_vertices();
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[0].position, mesh.positions()[0].to_array());
        assert_eq!(verts[0].normal, mesh.normals()[0].to_array());
    }
}
