//! Planar vertex position to noise-space coordinate mapping.
//!
//! Each noise family expects its own coordinate space: OpenSimplex samples an
//! unbounded plane scaled per axis, while the Worley point set lives in the
//! unit square and needs the physical plane re-projected onto it.

use glam::DVec2;

/// Anisotropic scale for OpenSimplex sampling: `(x * x_scale, y * y_scale)`.
#[inline]
pub fn open_simplex_coordinate(x: f64, y: f64, offsets: (f64, f64)) -> DVec2 {
    DVec2::new(x * offsets.0, y * offsets.1)
}

/// Re-project a plane centred on the origin onto `[0, 1] x [0, 1]`.
///
/// `width` and `height` must be positive; a zero extent divides by zero.
#[inline]
pub fn unit_square_coordinate(x: f64, y: f64, width: f64, height: f64) -> DVec2 {
    DVec2::new((x + width / 2.0) / width, (y + height / 2.0) / height)
}
