//! Per-vertex height generation: map, sample, normalize, quantize, scale.

use glam::DVec2;
use tracing::debug;

use crate::oracle::{NoiseOracle, OracleSet};
use crate::params::TerrainParameters;
use crate::preview::PreviewImage;
use crate::quantize::dither;

/// Heights for one regeneration, parallel to the grid's vertex order.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    heights: Vec<f64>,
}

impl HeightField {
    /// Wrap precomputed heights.
    pub fn from_heights(heights: Vec<f64>) -> Self {
        Self { heights }
    }

    /// Heights in vertex order.
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// `true` when no samples were generated.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Smallest height, or `None` for an empty field.
    pub fn min(&self) -> Option<f64> {
        self.heights.iter().copied().reduce(f64::min)
    }

    /// Largest height, or `None` for an empty field.
    pub fn max(&self) -> Option<f64> {
        self.heights.iter().copied().reduce(f64::max)
    }

    /// Number of distinct height values (bitwise), useful to observe quantization.
    pub fn distinct_levels(&self) -> usize {
        let mut bits: Vec<u64> = self.heights.iter().map(|h| h.to_bits()).collect();
        bits.sort_unstable();
        bits.dedup();
        bits.len()
    }

    /// Grayscale preview, `columns x rows` pixels, `0` black and `max_height` white.
    pub fn to_preview(&self, columns: u32, rows: u32, max_height: f64) -> PreviewImage {
        let scale = if max_height > 0.0 { 1.0 / max_height } else { 0.0 };
        let unit: Vec<f64> = self.heights.iter().map(|h| h * scale).collect();
        PreviewImage::from_unit_values(columns, rows, &unit)
    }

    /// Consume the field and return the raw heights.
    pub fn into_vec(self) -> Vec<f64> {
        self.heights
    }
}

/// Computes heights for planar vertex positions with one oracle and one
/// parameter snapshot.
///
/// Holds only shared borrows, so generation cannot observe a half-updated
/// parameter record or oracle.
pub struct HeightFieldGenerator<'a> {
    oracle: &'a dyn NoiseOracle,
    params: &'a TerrainParameters,
}

impl<'a> HeightFieldGenerator<'a> {
    /// Use the oracle matching `params.noise_kind`.
    pub fn new(oracles: &'a OracleSet, params: &'a TerrainParameters) -> Self {
        Self {
            oracle: oracles.select(params.noise_kind),
            params,
        }
    }

    /// Use an explicit oracle, regardless of `params.noise_kind`.
    pub fn with_oracle(oracle: &'a dyn NoiseOracle, params: &'a TerrainParameters) -> Self {
        Self { oracle, params }
    }

    /// Height at planar position `(x, y)`:
    /// `max_height * dither(normalize(sample(map(x, y))), dither_levels)`.
    pub fn height_at(&self, x: f64, y: f64) -> f64 {
        let c = self.oracle.normalized_at(x, y, self.params);
        self.params.max_height * dither(c, self.params.dither_levels)
    }

    /// Heights for every position, in input order.
    pub fn generate(&self, positions: &[DVec2]) -> HeightField {
        let heights: Vec<f64> = positions.iter().map(|p| self.height_at(p.x, p.y)).collect();
        debug!(
            noise = %self.oracle.kind(),
            samples = heights.len(),
            levels = self.params.dither_levels,
            "generated height field"
        );
        HeightField { heights }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DistanceMetric, NoiseKind};

    fn grid_positions(width: f64, height: f64, sx: u32, sy: u32) -> Vec<DVec2> {
        let mut out = Vec::new();
        for iy in 0..=sy {
            for ix in 0..=sx {
                out.push(DVec2::new(
                    ix as f64 * width / sx as f64 - width / 2.0,
                    height / 2.0 - iy as f64 * height / sy as f64,
                ));
            }
        }
        out
    }

    #[test]
    fn test_repeated_generation_is_bit_identical() {
        let oracles = OracleSet::new(42, 10);
        for kind in NoiseKind::ALL {
            let params = TerrainParameters {
                noise_kind: kind,
                dither_levels: 7,
                ..Default::default()
            };
            let positions = grid_positions(50.0, 50.0, 20, 20);
            let a = HeightFieldGenerator::new(&oracles, &params).generate(&positions);
            let b = HeightFieldGenerator::new(&oracles, &params).generate(&positions);
            let a_bits: Vec<u64> = a.heights().iter().map(|h| h.to_bits()).collect();
            let b_bits: Vec<u64> = b.heights().iter().map(|h| h.to_bits()).collect();
            assert_eq!(a_bits, b_bits, "{kind} generation is not deterministic");
        }
    }

    #[test]
    fn test_doubling_max_height_doubles_every_sample() {
        let oracles = OracleSet::new(7, 10);
        let positions = grid_positions(50.0, 50.0, 16, 16);
        for kind in NoiseKind::ALL {
            let base = TerrainParameters {
                noise_kind: kind,
                dither_levels: 5,
                ..Default::default()
            };
            let doubled = TerrainParameters {
                max_height: base.max_height * 2.0,
                ..base.clone()
            };
            let a = HeightFieldGenerator::new(&oracles, &base).generate(&positions);
            let b = HeightFieldGenerator::new(&oracles, &doubled).generate(&positions);
            for (ha, hb) in a.heights().iter().zip(b.heights()) {
                assert_eq!(*hb, ha * 2.0);
            }
        }
    }

    #[test]
    fn test_zero_offsets_flatten_open_simplex_terrain() {
        let oracles = OracleSet::new(3, 10);
        let params = TerrainParameters {
            plane_width: 50.0,
            plane_height: 50.0,
            grid_segments_x: 2,
            grid_segments_y: 2,
            noise_kind: NoiseKind::OpenSimplex,
            open_simplex_offsets: (0.0, 0.0),
            dither_levels: 1,
            max_height: 6.0,
            ..Default::default()
        };
        let positions = grid_positions(50.0, 50.0, 2, 2);
        assert_eq!(positions.len(), 9);

        let r = oracles
            .open_simplex()
            .sample(DVec2::ZERO, &params);
        let expected = 6.0 * (r + 1.0) / 2.0;

        let field = HeightFieldGenerator::new(&oracles, &params).generate(&positions);
        assert_eq!(field.len(), 9);
        for h in field.heights() {
            assert_eq!(*h, expected);
        }
    }

    #[test]
    fn test_quantized_heights_are_multiples_of_step() {
        let oracles = OracleSet::new(11, 10);
        let levels = 4;
        let params = TerrainParameters {
            dither_levels: levels,
            max_height: 9.0,
            ..Default::default()
        };
        let allowed: Vec<f64> = (0..levels)
            .map(|i| 9.0 * (i as f64 / (levels - 1) as f64))
            .collect();
        let field =
            HeightFieldGenerator::new(&oracles, &params).generate(&grid_positions(50.0, 50.0, 30, 30));
        assert!(field.distinct_levels() <= levels as usize);
        for h in field.heights() {
            assert!(allowed.contains(h), "height {h} is not a quantized level");
        }
    }

    #[test]
    fn test_heights_stay_within_max_height() {
        let oracles = OracleSet::new(19, 10);
        let params = TerrainParameters {
            max_height: 12.0,
            ..Default::default()
        };
        let field =
            HeightFieldGenerator::new(&oracles, &params).generate(&grid_positions(50.0, 50.0, 40, 40));
        assert!(field.min().unwrap() >= -1e-9);
        assert!(field.max().unwrap() <= 12.0 + 1e-9);
    }

    #[test]
    fn test_sparse_worley_points_stay_on_level_set() {
        let oracles = OracleSet::new(1, 1);
        let levels = 3;
        let params = TerrainParameters {
            noise_kind: NoiseKind::Worley,
            worley_point_count: 1,
            dither_levels: levels,
            ..Default::default()
        };
        let allowed: Vec<f64> = (0..levels)
            .map(|i| params.max_height * (i as f64 / (levels - 1) as f64))
            .collect();
        let positions = grid_positions(50.0, 50.0, 20, 20);
        let field = HeightFieldGenerator::new(&oracles, &params).generate(&positions);
        assert!(field.max().unwrap() <= params.max_height);
        assert!(field.distinct_levels() <= levels as usize);
        for h in field.heights() {
            assert!(allowed.contains(h), "height {h} is not a quantized level");
        }
    }

    #[test]
    fn test_worley_center_uses_unit_square_center() {
        let oracles = OracleSet::new(23, 10);
        for (w, h) in [(50.0, 50.0), (200.0, 10.0)] {
            let params = TerrainParameters {
                noise_kind: NoiseKind::Worley,
                plane_width: w,
                plane_height: h,
                max_height: 1.0,
                ..Default::default()
            };
            let expected =
                oracles
                    .worley()
                    .distance(DVec2::new(0.5, 0.5), 1, DistanceMetric::Euclidean);
            let generator = HeightFieldGenerator::new(&oracles, &params);
            assert_eq!(generator.height_at(0.0, 0.0), expected);
        }
    }

    #[test]
    fn test_worley_metric_changes_field() {
        let oracles = OracleSet::new(29, 10);
        let euclid = TerrainParameters {
            noise_kind: NoiseKind::Worley,
            ..Default::default()
        };
        let manhattan = TerrainParameters {
            distance_metric: DistanceMetric::Manhattan,
            ..euclid.clone()
        };
        let positions = grid_positions(50.0, 50.0, 10, 10);
        let a = HeightFieldGenerator::new(&oracles, &euclid).generate(&positions);
        let b = HeightFieldGenerator::new(&oracles, &manhattan).generate(&positions);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_positions_produce_empty_field() {
        let oracles = OracleSet::new(1, 1);
        let params = TerrainParameters::default();
        let field = HeightFieldGenerator::new(&oracles, &params).generate(&[]);
        assert!(field.is_empty());
        assert_eq!(field.min(), None);
    }
}
