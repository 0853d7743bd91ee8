//! Noise oracle capability and the two concrete noise families.
//!
//! Each oracle owns its coordinate mapping and normalization, so the height
//! pipeline never branches on the noise family itself.

use glam::DVec2;
use noise::{NoiseFn, OpenSimplex};

use crate::coords::open_simplex_coordinate;
use crate::params::{NoiseKind, TerrainParameters};
use crate::seed::{OracleStream, derive_oracle_seed};
use crate::worley::WorleyOracle;

/// A deterministic-given-seed scalar field over 2D coordinates.
pub trait NoiseOracle {
    /// The noise family this oracle implements.
    fn kind(&self) -> NoiseKind;

    /// Map a planar vertex position into this oracle's coordinate space.
    fn map_coordinate(&self, x: f64, y: f64, params: &TerrainParameters) -> DVec2;

    /// Raw field value at an already-mapped coordinate.
    fn sample(&self, coord: DVec2, params: &TerrainParameters) -> f64;

    /// Bring a raw value into the quantizer's `[0, 1]` input range.
    fn normalize(&self, raw: f64) -> f64;

    /// Map, sample and normalize in one step.
    fn normalized_at(&self, x: f64, y: f64, params: &TerrainParameters) -> f64 {
        let coord = self.map_coordinate(x, y, params);
        self.normalize(self.sample(coord, params))
    }
}

/// OpenSimplex gradient noise, raw output in approximately `[-1, 1]`.
pub struct OpenSimplexOracle {
    noise: OpenSimplex,
    seed: u32,
}

impl OpenSimplexOracle {
    /// Create an oracle with the given seed.
    pub fn new(seed: u32) -> Self {
        Self {
            noise: OpenSimplex::new(seed),
            seed,
        }
    }

    /// Seed this oracle was created with.
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseOracle for OpenSimplexOracle {
    fn kind(&self) -> NoiseKind {
        NoiseKind::OpenSimplex
    }

    fn map_coordinate(&self, x: f64, y: f64, params: &TerrainParameters) -> DVec2 {
        open_simplex_coordinate(x, y, params.open_simplex_offsets)
    }

    fn sample(&self, coord: DVec2, _params: &TerrainParameters) -> f64 {
        self.noise.get([coord.x, coord.y])
    }

    fn normalize(&self, raw: f64) -> f64 {
        (raw + 1.0) / 2.0
    }
}

/// Both oracle instances, owned together so a session can reseed them
/// independently.
pub struct OracleSet {
    open_simplex: OpenSimplexOracle,
    worley: WorleyOracle,
    base_seed: u64,
}

impl OracleSet {
    /// Create both oracles from one base seed.
    pub fn new(base_seed: u64, worley_point_count: u32) -> Self {
        Self {
            open_simplex: OpenSimplexOracle::new(
                derive_oracle_seed(base_seed, OracleStream::OpenSimplex) as u32,
            ),
            worley: WorleyOracle::new(
                worley_point_count,
                derive_oracle_seed(base_seed, OracleStream::Worley),
            ),
            base_seed,
        }
    }

    /// Replace both oracles with fresh instances (the reset action).
    pub fn reseed_all(&mut self, base_seed: u64, worley_point_count: u32) {
        *self = Self::new(base_seed, worley_point_count);
    }

    /// Replace only the Worley oracle, leaving the OpenSimplex field untouched.
    pub fn reseed_worley(&mut self, seed: u64, point_count: u32) {
        self.worley = WorleyOracle::new(
            point_count,
            derive_oracle_seed(seed, OracleStream::Worley),
        );
    }

    /// The oracle for the given noise family.
    pub fn select(&self, kind: NoiseKind) -> &dyn NoiseOracle {
        match kind {
            NoiseKind::OpenSimplex => &self.open_simplex,
            NoiseKind::Worley => &self.worley,
        }
    }

    /// The OpenSimplex oracle.
    pub fn open_simplex(&self) -> &OpenSimplexOracle {
        &self.open_simplex
    }

    /// The Worley oracle.
    pub fn worley(&self) -> &WorleyOracle {
        &self.worley
    }

    /// Seed passed to the last full (re)seed.
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }
}
