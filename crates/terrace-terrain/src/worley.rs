//! Worley (cellular) distance field over a finite point set in the unit square.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::coords::unit_square_coordinate;
use crate::oracle::NoiseOracle;
use crate::params::{DistanceMetric, NoiseKind, TerrainParameters};

/// Nearest-point distance field over `point_count` seeded points in `[0, 1)^2`.
///
/// Raw distances fall in `[0, sqrt(2)]` (Euclidean) or `[0, 2]` (Manhattan).
/// [`normalize`](NoiseOracle::normalize) passes them through unscaled and caps
/// them at 1, so a sparse point set yields flat plateaus at `max_height`
/// instead of heights above it.
#[derive(Clone, Debug)]
pub struct WorleyOracle {
    points: Vec<DVec2>,
    seed: u64,
}

impl WorleyOracle {
    /// Scatter `point_count` points using a `ChaCha8Rng` seeded with `seed`.
    pub fn new(point_count: u32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points = (0..point_count)
            .map(|_| DVec2::new(rng.random::<f64>(), rng.random::<f64>()))
            .collect();
        Self { points, seed }
    }

    /// The scattered feature points.
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Number of feature points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Seed the point set was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Distance from `coord` to its `k`-th nearest feature point (`k` is 1-based).
    ///
    /// Returns `f64::INFINITY` when `k` exceeds the number of points. `k == 0`
    /// is treated as `1`.
    pub fn distance(&self, coord: DVec2, k: usize, metric: DistanceMetric) -> f64 {
        let k = k.max(1);
        if k > self.points.len() {
            return f64::INFINITY;
        }

        // Euclidean distances are compared squared and rooted once at the end.
        let raw = |p: &DVec2| {
            let d = *p - coord;
            match metric {
                DistanceMetric::Euclidean => d.length_squared(),
                DistanceMetric::Manhattan => d.x.abs() + d.y.abs(),
            }
        };

        let nth = if k == 1 {
            self.points.iter().map(raw).fold(f64::INFINITY, f64::min)
        } else {
            let mut distances: Vec<f64> = self.points.iter().map(raw).collect();
            let (_, nth, _) = distances.select_nth_unstable_by(k - 1, |a, b| a.total_cmp(b));
            *nth
        };

        match metric {
            DistanceMetric::Euclidean => nth.sqrt(),
            DistanceMetric::Manhattan => nth,
        }
    }

    /// Render the nearest-point field on a `resolution x resolution` grid,
    /// divided by its maximum so the result spans `[0, 1]`.
    ///
    /// Row-major, row 0 at `y = 0`.
    pub fn render_field(&self, resolution: u32, metric: DistanceMetric) -> Vec<f64> {
        let res = resolution.max(1);
        let mut values = Vec::with_capacity((res * res) as usize);
        for py in 0..res {
            for px in 0..res {
                let coord = DVec2::new(px as f64 / res as f64, py as f64 / res as f64);
                values.push(self.distance(coord, 1, metric));
            }
        }

        let max = values.iter().copied().fold(0.0_f64, f64::max);
        if max > 0.0 && max.is_finite() {
            for v in &mut values {
                *v /= max;
            }
        }
        values
    }
}

impl NoiseOracle for WorleyOracle {
    fn kind(&self) -> NoiseKind {
        NoiseKind::Worley
    }

    fn map_coordinate(&self, x: f64, y: f64, params: &TerrainParameters) -> DVec2 {
        unit_square_coordinate(x, y, params.plane_width, params.plane_height)
    }

    fn sample(&self, coord: DVec2, params: &TerrainParameters) -> f64 {
        self.distance(coord, 1, params.distance_metric)
    }

    /// Unscaled, capped at 1. An empty point set (infinite distance) maps
    /// to 1 as well.
    fn normalize(&self, raw: f64) -> f64 {
        raw.min(1.0)
    }
}
