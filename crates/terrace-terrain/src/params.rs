//! Terrain parameter record and the ranges the settings surface enforces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Which noise family drives the height field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Continuous OpenSimplex gradient noise, raw output in `[-1, 1]`.
    #[default]
    OpenSimplex,
    /// Cellular distance field over a finite point set in the unit square.
    Worley,
}

impl NoiseKind {
    /// Both noise families, in settings-panel order.
    pub const ALL: [NoiseKind; 2] = [NoiseKind::OpenSimplex, NoiseKind::Worley];

    /// Canonical snake_case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            NoiseKind::OpenSimplex => "open_simplex",
            NoiseKind::Worley => "worley",
        }
    }

    /// The other noise family.
    pub fn toggled(self) -> Self {
        match self {
            NoiseKind::OpenSimplex => NoiseKind::Worley,
            NoiseKind::Worley => NoiseKind::OpenSimplex,
        }
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoiseKind {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "opensimplex" | "simplex" => Ok(NoiseKind::OpenSimplex),
            "worley" | "cellular" => Ok(NoiseKind::Worley),
            _ => Err(TerrainError::UnknownNoiseKind(s.to_string())),
        }
    }
}

/// Distance metric used by the Worley oracle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Sum of absolute axis differences.
    Manhattan,
}

impl DistanceMetric {
    /// Canonical snake_case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "manhattan" => Ok(DistanceMetric::Manhattan),
            _ => Err(TerrainError::UnknownDistanceMetric(s.to_string())),
        }
    }
}

/// Lowercase and strip `_`, `-` and spaces so `OpenSimplex`, `open_simplex`
/// and `open-simplex` compare equal.
pub(crate) fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// An sRGB color, serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Pure green, the default terrain color.
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);

    /// Build a color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear-space `[r, g, b, 1.0]` for GPU uniforms.
    pub fn to_linear_rgba(self) -> [f32; 4] {
        fn channel(c: u8) -> f32 {
            let c = f32::from(c) / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [channel(self.r), channel(self.g), channel(self.b), 1.0]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::GREEN
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TerrainError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = TerrainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Inclusive range and step size for one numeric parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    /// Clamp a real value into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Clamp an integer value into the range.
    pub fn clamp_u32(&self, value: u32) -> u32 {
        (value as f64).clamp(self.min, self.max) as u32
    }

    /// One step up, clamped.
    pub fn step_up(&self, value: f64) -> f64 {
        self.clamp(value + self.step)
    }

    /// One step down, clamped.
    pub fn step_down(&self, value: f64) -> f64 {
        self.clamp(value - self.step)
    }
}

/// Maximum terrain height.
pub const MAX_HEIGHT_RANGE: ParamRange = ParamRange {
    min: 1.0,
    max: 50.0,
    step: 2.0,
};

/// OpenSimplex anisotropic coordinate scales.
pub const OFFSET_RANGE: ParamRange = ParamRange {
    min: 0.0,
    max: 1.0,
    step: 0.1,
};

/// Number of points in the Worley point set.
pub const WORLEY_POINTS_RANGE: ParamRange = ParamRange {
    min: 1.0,
    max: 20.0,
    step: 1.0,
};

/// Grid subdivisions along either axis.
pub const SEGMENTS_RANGE: ParamRange = ParamRange {
    min: 1.0,
    max: 300.0,
    step: 1.0,
};

/// Quantization level count.
pub const DITHER_LEVELS_RANGE: ParamRange = ParamRange {
    min: 1.0,
    max: 50.0,
    step: 1.0,
};

/// Physical plane width and height.
pub const PLANE_SIZE_RANGE: ParamRange = ParamRange {
    min: 1.0,
    max: 200.0,
    step: 1.0,
};

/// Everything that shapes one regeneration of the terrain.
///
/// The generator treats this record as read-only and trusts it: sizes must be
/// positive and finite (a zero plane size yields non-finite Worley heights).
/// Range enforcement belongs to whatever produces the record: edits go through
/// [`ParameterChange::clamped`](crate::ParameterChange::clamped) and loaded
/// files through [`TerrainParameters::clamped`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParameters {
    /// Active noise family.
    pub noise_kind: NoiseKind,
    /// Scale applied to the quantized `[0, 1]` value.
    pub max_height: f64,
    /// `(x_scale, y_scale)` applied to vertex coordinates before OpenSimplex sampling.
    pub open_simplex_offsets: (f64, f64),
    /// Number of points in the Worley point set. Changing it reseeds the oracle.
    pub worley_point_count: u32,
    /// Worley distance metric.
    pub distance_metric: DistanceMetric,
    /// Subdivisions along the plane's width.
    pub grid_segments_x: u32,
    /// Subdivisions along the plane's height.
    pub grid_segments_y: u32,
    /// Quantization level count; `1` disables quantization.
    pub dither_levels: u32,
    /// Physical extent along X.
    pub plane_width: f64,
    /// Physical extent along Y (Z after the ground rotation).
    pub plane_height: f64,
    /// Build a line wireframe instead of a shaded mesh.
    pub wireframe: bool,
    /// Uniform color of the shaded mesh.
    pub color: Color,
}

impl Default for TerrainParameters {
    fn default() -> Self {
        Self {
            noise_kind: NoiseKind::OpenSimplex,
            max_height: 6.0,
            open_simplex_offsets: (0.2, 0.2),
            worley_point_count: 10,
            distance_metric: DistanceMetric::Euclidean,
            grid_segments_x: 100,
            grid_segments_y: 100,
            dither_levels: 1,
            plane_width: 50.0,
            plane_height: 50.0,
            wireframe: false,
            color: Color::GREEN,
        }
    }
}

impl TerrainParameters {
    /// Number of grid vertices, `(segments_x + 1) * (segments_y + 1)`.
    pub fn vertex_count(&self) -> usize {
        (self.grid_segments_x as usize + 1) * (self.grid_segments_y as usize + 1)
    }

    /// Edge length of the axes helper: `max(width, height) / 2 + 5`.
    pub fn axes_size(&self) -> f64 {
        self.plane_width.max(self.plane_height) / 2.0 + 5.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_kind_parses_common_spellings() {
        for s in ["OpenSimplex", "open_simplex", "open-simplex", " opensimplex "] {
            assert_eq!(s.parse::<NoiseKind>().unwrap(), NoiseKind::OpenSimplex);
        }
        assert_eq!("Worley".parse::<NoiseKind>().unwrap(), NoiseKind::Worley);
    }

    #[test]
    fn test_unknown_noise_kind_is_an_error() {
        let err = "Perlin".parse::<NoiseKind>().unwrap_err();
        assert_eq!(err, TerrainError::UnknownNoiseKind("Perlin".to_string()));
    }

    #[test]
    fn test_noise_kind_name_roundtrips_through_from_str() {
        for kind in NoiseKind::ALL {
            assert_eq!(kind.name().parse::<NoiseKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_distance_metric_parse() {
        assert_eq!(
            "Manhattan".parse::<DistanceMetric>().unwrap(),
            DistanceMetric::Manhattan
        );
        assert!("chebyshev".parse::<DistanceMetric>().is_err());
    }

    #[test]
    fn test_color_parse_and_display() {
        let c: Color = "#00ff00".parse().unwrap();
        assert_eq!(c, Color::GREEN);
        assert_eq!(Color::rgb(0x12, 0xab, 0xef).to_string(), "#12abef");
        assert!("00ff00".parse::<Color>().is_err());
        assert!("#00ff0".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_linear_endpoints() {
        let rgba = Color::rgb(0, 255, 0).to_linear_rgba();
        assert_eq!(rgba, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_color_serializes_as_hex_string() {
        let s = ron::to_string(&Color::rgb(255, 0, 128)).unwrap();
        assert_eq!(s, "\"#ff0080\"");
        let back: Color = ron::from_str(&s).unwrap();
        assert_eq!(back, Color::rgb(255, 0, 128));
    }

    #[test]
    fn test_defaults_match_settings_panel() {
        let p = TerrainParameters::default();
        assert_eq!(p.noise_kind, NoiseKind::OpenSimplex);
        assert_eq!(p.max_height, 6.0);
        assert_eq!(p.open_simplex_offsets, (0.2, 0.2));
        assert_eq!(p.worley_point_count, 10);
        assert_eq!(p.grid_segments_x, 100);
        assert_eq!(p.dither_levels, 1);
        assert_eq!(p.plane_width, 50.0);
        assert!(!p.wireframe);
    }

    #[test]
    fn test_vertex_count() {
        let p = TerrainParameters {
            grid_segments_x: 2,
            grid_segments_y: 3,
            ..Default::default()
        };
        assert_eq!(p.vertex_count(), 12);
    }

    #[test]
    fn test_axes_size_uses_larger_side() {
        let p = TerrainParameters {
            plane_width: 40.0,
            plane_height: 100.0,
            ..Default::default()
        };
        assert_eq!(p.axes_size(), 55.0);
    }

    #[test]
    fn test_param_range_clamps_and_steps() {
        assert_eq!(MAX_HEIGHT_RANGE.clamp(80.0), 50.0);
        assert_eq!(MAX_HEIGHT_RANGE.step_up(6.0), 8.0);
        assert_eq!(MAX_HEIGHT_RANGE.step_down(2.0), 1.0);
        assert_eq!(SEGMENTS_RANGE.clamp_u32(0), 1);
        assert_eq!(SEGMENTS_RANGE.clamp_u32(1000), 300);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let p: TerrainParameters = ron::from_str("(max_height: 12.0)").unwrap();
        assert_eq!(p.max_height, 12.0);
        assert_eq!(p.worley_point_count, 10);
    }

    #[test]
    fn test_unknown_noise_variant_fails_to_deserialize() {
        let result: Result<TerrainParameters, _> = ron::from_str("(noise_kind: Perlin)");
        assert!(result.is_err());
    }
}
