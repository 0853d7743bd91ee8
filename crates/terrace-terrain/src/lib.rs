//! Quantized procedural height fields: noise oracles, coordinate mapping,
//! dithering, and the per-vertex height generation pipeline.

mod command;
mod coords;
mod error;
mod height_field;
mod oracle;
mod params;
mod preview;
mod quantize;
mod seed;
mod worley;

pub use command::{ChangeEffect, ParameterChange};
pub use coords::{open_simplex_coordinate, unit_square_coordinate};
pub use error::TerrainError;
pub use height_field::{HeightField, HeightFieldGenerator};
pub use oracle::{NoiseOracle, OpenSimplexOracle, OracleSet};
pub use params::{
    Color, DistanceMetric, NoiseKind, ParamRange, TerrainParameters, DITHER_LEVELS_RANGE,
    MAX_HEIGHT_RANGE, OFFSET_RANGE, PLANE_SIZE_RANGE, SEGMENTS_RANGE, WORLEY_POINTS_RANGE,
};
pub use preview::PreviewImage;
pub use quantize::dither;
pub use seed::{OracleStream, derive_oracle_seed, wall_clock_seed};
pub use worley::WorleyOracle;
