//! Parameter commands: the message interface the settings surface uses to
//! edit a [`TerrainParameters`] record.

use std::fmt;

use crate::error::TerrainError;
use crate::params::{
    Color, DITHER_LEVELS_RANGE, DistanceMetric, MAX_HEIGHT_RANGE, NoiseKind, OFFSET_RANGE,
    PLANE_SIZE_RANGE, SEGMENTS_RANGE, TerrainParameters, WORLEY_POINTS_RANGE, normalize_token,
};

/// A single edit to one terrain parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParameterChange {
    NoiseKind(NoiseKind),
    MaxHeight(f64),
    XOffset(f64),
    YOffset(f64),
    WorleyPointCount(u32),
    DistanceMetric(DistanceMetric),
    /// Sets both grid axes at once, matching the single "segments" slider.
    Segments(u32),
    SegmentsX(u32),
    SegmentsY(u32),
    DitherLevels(u32),
    PlaneWidth(f64),
    PlaneHeight(f64),
    Color(Color),
    Wireframe(bool),
}

/// What the owner of the parameters must do after a change was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeEffect {
    /// Regenerate the terrain with the existing oracle state.
    Rebuild,
    /// Replace the Worley oracle with a fresh point set, then regenerate.
    ReseedWorley,
}

impl ParameterChange {
    /// Parse a textual `(field, value)` pair.
    ///
    /// Field names are the snake_case parameter names; the settings-panel
    /// labels `xoff`, `yoff`, `worley_pts`, `steps`, `xsize` and `ysize` are
    /// accepted as aliases. Values are not range-checked here, see
    /// [`clamped`](Self::clamped).
    pub fn parse(field: &str, value: &str) -> Result<Self, TerrainError> {
        let value = value.trim();
        let change = match normalize_token(field).as_str() {
            "noisekind" | "noise" => ParameterChange::NoiseKind(value.parse()?),
            "maxheight" => ParameterChange::MaxHeight(parse_real("max_height", value)?),
            "xoffset" | "xoff" => ParameterChange::XOffset(parse_real("x_offset", value)?),
            "yoffset" | "yoff" => ParameterChange::YOffset(parse_real("y_offset", value)?),
            "worleypointcount" | "worleypts" | "worleypoints" => ParameterChange::WorleyPointCount(
                parse_integer("worley_point_count", value)?,
            ),
            "distancemetric" | "metric" => ParameterChange::DistanceMetric(value.parse()?),
            "segments" => ParameterChange::Segments(parse_integer("segments", value)?),
            "segmentsx" | "gridsegmentsx" => {
                ParameterChange::SegmentsX(parse_integer("segments_x", value)?)
            }
            "segmentsy" | "gridsegmentsy" => {
                ParameterChange::SegmentsY(parse_integer("segments_y", value)?)
            }
            "ditherlevels" | "steps" => {
                ParameterChange::DitherLevels(parse_integer("dither_levels", value)?)
            }
            "planewidth" | "xsize" => ParameterChange::PlaneWidth(parse_real("plane_width", value)?),
            "planeheight" | "ysize" => {
                ParameterChange::PlaneHeight(parse_real("plane_height", value)?)
            }
            "color" | "colour" => ParameterChange::Color(value.parse()?),
            "wireframe" => ParameterChange::Wireframe(parse_bool("wireframe", value)?),
            _ => return Err(TerrainError::UnknownParameter(field.to_string())),
        };
        Ok(change)
    }

    /// Canonical field name.
    pub fn field(&self) -> &'static str {
        match self {
            ParameterChange::NoiseKind(_) => "noise_kind",
            ParameterChange::MaxHeight(_) => "max_height",
            ParameterChange::XOffset(_) => "x_offset",
            ParameterChange::YOffset(_) => "y_offset",
            ParameterChange::WorleyPointCount(_) => "worley_point_count",
            ParameterChange::DistanceMetric(_) => "distance_metric",
            ParameterChange::Segments(_) => "segments",
            ParameterChange::SegmentsX(_) => "segments_x",
            ParameterChange::SegmentsY(_) => "segments_y",
            ParameterChange::DitherLevels(_) => "dither_levels",
            ParameterChange::PlaneWidth(_) => "plane_width",
            ParameterChange::PlaneHeight(_) => "plane_height",
            ParameterChange::Color(_) => "color",
            ParameterChange::Wireframe(_) => "wireframe",
        }
    }

    /// The same change with its value forced into the settings-panel range.
    pub fn clamped(self) -> Self {
        match self {
            ParameterChange::MaxHeight(v) => ParameterChange::MaxHeight(MAX_HEIGHT_RANGE.clamp(v)),
            ParameterChange::XOffset(v) => ParameterChange::XOffset(OFFSET_RANGE.clamp(v)),
            ParameterChange::YOffset(v) => ParameterChange::YOffset(OFFSET_RANGE.clamp(v)),
            ParameterChange::WorleyPointCount(n) => {
                ParameterChange::WorleyPointCount(WORLEY_POINTS_RANGE.clamp_u32(n))
            }
            ParameterChange::Segments(n) => ParameterChange::Segments(SEGMENTS_RANGE.clamp_u32(n)),
            ParameterChange::SegmentsX(n) => {
                ParameterChange::SegmentsX(SEGMENTS_RANGE.clamp_u32(n))
            }
            ParameterChange::SegmentsY(n) => {
                ParameterChange::SegmentsY(SEGMENTS_RANGE.clamp_u32(n))
            }
            ParameterChange::DitherLevels(n) => {
                ParameterChange::DitherLevels(DITHER_LEVELS_RANGE.clamp_u32(n))
            }
            ParameterChange::PlaneWidth(v) => {
                ParameterChange::PlaneWidth(PLANE_SIZE_RANGE.clamp(v))
            }
            ParameterChange::PlaneHeight(v) => {
                ParameterChange::PlaneHeight(PLANE_SIZE_RANGE.clamp(v))
            }
            other => other,
        }
    }

    /// Write the change into `params`.
    ///
    /// Returns [`ChangeEffect::ReseedWorley`] only when the Worley point count
    /// actually changed; re-submitting the current value is a plain rebuild so
    /// that no-op edits stay idempotent.
    pub fn apply(self, params: &mut TerrainParameters) -> ChangeEffect {
        match self {
            ParameterChange::NoiseKind(kind) => params.noise_kind = kind,
            ParameterChange::MaxHeight(v) => params.max_height = v,
            ParameterChange::XOffset(v) => params.open_simplex_offsets.0 = v,
            ParameterChange::YOffset(v) => params.open_simplex_offsets.1 = v,
            ParameterChange::WorleyPointCount(n) => {
                let changed = params.worley_point_count != n;
                params.worley_point_count = n;
                if changed {
                    return ChangeEffect::ReseedWorley;
                }
            }
            ParameterChange::DistanceMetric(m) => params.distance_metric = m,
            ParameterChange::Segments(n) => {
                params.grid_segments_x = n;
                params.grid_segments_y = n;
            }
            ParameterChange::SegmentsX(n) => params.grid_segments_x = n,
            ParameterChange::SegmentsY(n) => params.grid_segments_y = n,
            ParameterChange::DitherLevels(n) => params.dither_levels = n,
            ParameterChange::PlaneWidth(v) => params.plane_width = v,
            ParameterChange::PlaneHeight(v) => params.plane_height = v,
            ParameterChange::Color(c) => params.color = c,
            ParameterChange::Wireframe(on) => params.wireframe = on,
        }
        ChangeEffect::Rebuild
    }
}

impl fmt::Display for ParameterChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.field())?;
        match self {
            ParameterChange::NoiseKind(v) => write!(f, "{v}"),
            ParameterChange::DistanceMetric(v) => write!(f, "{v}"),
            ParameterChange::Color(v) => write!(f, "{v}"),
            ParameterChange::Wireframe(v) => write!(f, "{v}"),
            ParameterChange::MaxHeight(v)
            | ParameterChange::XOffset(v)
            | ParameterChange::YOffset(v)
            | ParameterChange::PlaneWidth(v)
            | ParameterChange::PlaneHeight(v) => write!(f, "{v}"),
            ParameterChange::WorleyPointCount(n)
            | ParameterChange::Segments(n)
            | ParameterChange::SegmentsX(n)
            | ParameterChange::SegmentsY(n)
            | ParameterChange::DitherLevels(n) => write!(f, "{n}"),
        }
    }
}

impl TerrainParameters {
    /// The commands that turn `self` into `other`, one per differing field.
    ///
    /// Used to replay an edited configuration file through the same command
    /// path as interactive edits.
    pub fn changes_to(&self, other: &TerrainParameters) -> Vec<ParameterChange> {
        let mut changes = Vec::new();
        if self.noise_kind != other.noise_kind {
            changes.push(ParameterChange::NoiseKind(other.noise_kind));
        }
        if self.max_height != other.max_height {
            changes.push(ParameterChange::MaxHeight(other.max_height));
        }
        if self.open_simplex_offsets.0 != other.open_simplex_offsets.0 {
            changes.push(ParameterChange::XOffset(other.open_simplex_offsets.0));
        }
        if self.open_simplex_offsets.1 != other.open_simplex_offsets.1 {
            changes.push(ParameterChange::YOffset(other.open_simplex_offsets.1));
        }
        if self.worley_point_count != other.worley_point_count {
            changes.push(ParameterChange::WorleyPointCount(other.worley_point_count));
        }
        if self.distance_metric != other.distance_metric {
            changes.push(ParameterChange::DistanceMetric(other.distance_metric));
        }
        if self.grid_segments_x != other.grid_segments_x {
            changes.push(ParameterChange::SegmentsX(other.grid_segments_x));
        }
        if self.grid_segments_y != other.grid_segments_y {
            changes.push(ParameterChange::SegmentsY(other.grid_segments_y));
        }
        if self.dither_levels != other.dither_levels {
            changes.push(ParameterChange::DitherLevels(other.dither_levels));
        }
        if self.plane_width != other.plane_width {
            changes.push(ParameterChange::PlaneWidth(other.plane_width));
        }
        if self.plane_height != other.plane_height {
            changes.push(ParameterChange::PlaneHeight(other.plane_height));
        }
        if self.color != other.color {
            changes.push(ParameterChange::Color(other.color));
        }
        if self.wireframe != other.wireframe {
            changes.push(ParameterChange::Wireframe(other.wireframe));
        }
        changes
    }

    /// The same parameters with every numeric field forced into its
    /// settings-panel range. Applied to anything read from disk.
    pub fn clamped(&self) -> Self {
        let mut out = self.clone();
        let numeric = [
            ParameterChange::MaxHeight(self.max_height),
            ParameterChange::XOffset(self.open_simplex_offsets.0),
            ParameterChange::YOffset(self.open_simplex_offsets.1),
            ParameterChange::WorleyPointCount(self.worley_point_count),
            ParameterChange::SegmentsX(self.grid_segments_x),
            ParameterChange::SegmentsY(self.grid_segments_y),
            ParameterChange::DitherLevels(self.dither_levels),
            ParameterChange::PlaneWidth(self.plane_width),
            ParameterChange::PlaneHeight(self.plane_height),
        ];
        for change in numeric {
            change.clamped().apply(&mut out);
        }
        out
    }
}

fn invalid(field: &'static str, value: &str) -> TerrainError {
    TerrainError::InvalidValue {
        field,
        value: value.to_string(),
    }
}

fn parse_real(field: &'static str, value: &str) -> Result<f64, TerrainError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(field, value)),
    }
}

fn parse_integer(field: &'static str, value: &str) -> Result<u32, TerrainError> {
    if let Ok(n) = value.parse::<u32>() {
        return Ok(n);
    }
    // Sliders report whole numbers as reals ("12.0").
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => {
            Ok(v as u32)
        }
        _ => Err(invalid(field, value)),
    }
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, TerrainError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" => Ok(false),
        _ => Err(invalid(field, value)),
    }
}
