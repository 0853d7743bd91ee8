//! The subdivided rectangular plane the terrain is displaced from.

use glam::DVec2;
use terrace_terrain::TerrainParameters;

use crate::error::MeshError;

/// A `width x height` plane centred on the origin, split into
/// `segments_x x segments_y` cells of two triangles each.
///
/// Vertices are row-major: row 0 is the top edge (`y = +height / 2`), and
/// each row runs from `x = -width / 2` to `x = +width / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneGrid {
    pub width: f64,
    pub height: f64,
    pub segments_x: u32,
    pub segments_y: u32,
}

impl PlaneGrid {
    /// Create a grid. Segment counts of zero are raised to one.
    pub fn new(width: f64, height: f64, segments_x: u32, segments_y: u32) -> Self {
        Self {
            width,
            height,
            segments_x: segments_x.max(1),
            segments_y: segments_y.max(1),
        }
    }

    /// The grid described by a terrain parameter record.
    pub fn from_parameters(params: &TerrainParameters) -> Self {
        Self::new(
            params.plane_width,
            params.plane_height,
            params.grid_segments_x,
            params.grid_segments_y,
        )
    }

    /// Vertices per row.
    pub fn columns(&self) -> usize {
        self.segments_x as usize + 1
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.segments_y as usize + 1
    }

    /// `(segments_x + 1) * (segments_y + 1)`.
    pub fn vertex_count(&self) -> usize {
        self.columns() * self.rows()
    }

    /// Two triangles per cell.
    pub fn triangle_count(&self) -> usize {
        2 * self.segments_x as usize * self.segments_y as usize
    }

    /// Row-major index of the vertex at column `ix`, row `iy`.
    #[inline]
    pub fn index(&self, ix: u32, iy: u32) -> usize {
        iy as usize * self.columns() + ix as usize
    }

    /// Planar position of every vertex, in index order.
    pub fn planar_positions(&self) -> Vec<DVec2> {
        let cell_w = self.width / self.segments_x as f64;
        let cell_h = self.height / self.segments_y as f64;
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;

        let mut positions = Vec::with_capacity(self.vertex_count());
        for iy in 0..=self.segments_y {
            let y = half_h - iy as f64 * cell_h;
            for ix in 0..=self.segments_x {
                positions.push(DVec2::new(ix as f64 * cell_w - half_w, y));
            }
        }
        positions
    }

    /// Triangle list indices.
    ///
    /// Each cell with top-left `a`, bottom-left `b`, bottom-right `c` and
    /// top-right `d` emits `(a, b, d)` and `(b, c, d)`, counter-clockwise when
    /// seen from `+Z` before the ground rotation.
    pub fn triangle_indices(&self) -> Result<Vec<u32>, MeshError> {
        if u32::try_from(self.vertex_count()).is_err() {
            return Err(MeshError::IndexOverflow {
                vertices: self.vertex_count(),
            });
        }

        let mut indices = Vec::with_capacity(self.triangle_count() * 3);
        for iy in 0..self.segments_y {
            for ix in 0..self.segments_x {
                let a = self.index(ix, iy) as u32;
                let b = self.index(ix, iy + 1) as u32;
                let c = self.index(ix + 1, iy + 1) as u32;
                let d = self.index(ix + 1, iy) as u32;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        Ok(indices)
    }
}
