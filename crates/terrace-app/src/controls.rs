//! Keyboard bindings for the viewer's settings panel.
//!
//! | Key              | Effect                                  |
//! |------------------|-----------------------------------------|
//! | Tab              | toggle OpenSimplex / Worley             |
//! | Up / Down        | max height                              |
//! | Left / Right     | Worley point count                      |
//! | `[` / `]`        | quantization steps                      |
//! | `-` / `=`        | grid segments (both axes)               |
//! | `9` / `0`        | grid segments along x                   |
//! | O / P            | grid segments along y                   |
//! | `,` / `.`        | plane width                             |
//! | `;` / `'`        | plane height                            |
//! | C                | cycle terrain color                     |
//! | J / L, K / I     | OpenSimplex x / y offsets               |
//! | M                | distance metric                         |
//! | W                | wireframe                               |
//! | X                | axes overlay                            |
//! | R                | reseed both oracles                     |
//! | F5               | reload `config.ron`                     |
//! | Esc              | quit                                    |
//!
//! Shift multiplies numeric steps by ten.

use terrace_terrain::{
    Color, DITHER_LEVELS_RANGE, DistanceMetric, MAX_HEIGHT_RANGE, OFFSET_RANGE,
    PLANE_SIZE_RANGE, ParamRange, ParameterChange, SEGMENTS_RANGE, TerrainParameters,
    WORLEY_POINTS_RANGE,
};
use winit::keyboard::KeyCode;

/// Shift-held step multiplier.
pub const COARSE_STEP: f64 = 10.0;

/// Colors the C key cycles through.
pub const COLOR_CYCLE: [Color; 6] = [
    Color::GREEN,
    Color::rgb(0x8b, 0x5a, 0x2b),
    Color::rgb(0xc2, 0xb2, 0x80),
    Color::rgb(0x80, 0x80, 0x80),
    Color::rgb(0xff, 0xff, 0xff),
    Color::rgb(0x1e, 0x90, 0xff),
];

/// What a key press asks the viewer to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    Change(ParameterChange),
    ToggleAxes,
    Reset,
    ReloadConfig,
    Quit,
}

/// Map a key press to an action given the current parameters.
pub fn action_for_key(key: KeyCode, shift: bool, params: &TerrainParameters) -> Option<Action> {
    let scale = if shift { COARSE_STEP } else { 1.0 };
    let change = match key {
        KeyCode::Tab => ParameterChange::NoiseKind(params.noise_kind.toggled()),
        KeyCode::ArrowUp => {
            ParameterChange::MaxHeight(step(&MAX_HEIGHT_RANGE, params.max_height, scale))
        }
        KeyCode::ArrowDown => {
            ParameterChange::MaxHeight(step(&MAX_HEIGHT_RANGE, params.max_height, -scale))
        }
        KeyCode::ArrowRight => ParameterChange::WorleyPointCount(step_u32(
            &WORLEY_POINTS_RANGE,
            params.worley_point_count,
            scale,
        )),
        KeyCode::ArrowLeft => ParameterChange::WorleyPointCount(step_u32(
            &WORLEY_POINTS_RANGE,
            params.worley_point_count,
            -scale,
        )),
        KeyCode::BracketRight => ParameterChange::DitherLevels(step_u32(
            &DITHER_LEVELS_RANGE,
            params.dither_levels,
            scale,
        )),
        KeyCode::BracketLeft => ParameterChange::DitherLevels(step_u32(
            &DITHER_LEVELS_RANGE,
            params.dither_levels,
            -scale,
        )),
        KeyCode::Equal => {
            ParameterChange::Segments(step_u32(&SEGMENTS_RANGE, params.grid_segments_x, scale))
        }
        KeyCode::Minus => {
            ParameterChange::Segments(step_u32(&SEGMENTS_RANGE, params.grid_segments_x, -scale))
        }
        KeyCode::Digit0 => ParameterChange::SegmentsX(step_u32(
            &SEGMENTS_RANGE,
            params.grid_segments_x,
            scale,
        )),
        KeyCode::Digit9 => ParameterChange::SegmentsX(step_u32(
            &SEGMENTS_RANGE,
            params.grid_segments_x,
            -scale,
        )),
        KeyCode::KeyP => ParameterChange::SegmentsY(step_u32(
            &SEGMENTS_RANGE,
            params.grid_segments_y,
            scale,
        )),
        KeyCode::KeyO => ParameterChange::SegmentsY(step_u32(
            &SEGMENTS_RANGE,
            params.grid_segments_y,
            -scale,
        )),
        KeyCode::Period => {
            ParameterChange::PlaneWidth(step(&PLANE_SIZE_RANGE, params.plane_width, scale))
        }
        KeyCode::Comma => {
            ParameterChange::PlaneWidth(step(&PLANE_SIZE_RANGE, params.plane_width, -scale))
        }
        KeyCode::Quote => {
            ParameterChange::PlaneHeight(step(&PLANE_SIZE_RANGE, params.plane_height, scale))
        }
        KeyCode::Semicolon => {
            ParameterChange::PlaneHeight(step(&PLANE_SIZE_RANGE, params.plane_height, -scale))
        }
        KeyCode::KeyC => ParameterChange::Color(next_color(params.color)),
        KeyCode::KeyL => {
            ParameterChange::XOffset(step(&OFFSET_RANGE, params.open_simplex_offsets.0, scale))
        }
        KeyCode::KeyJ => {
            ParameterChange::XOffset(step(&OFFSET_RANGE, params.open_simplex_offsets.0, -scale))
        }
        KeyCode::KeyI => {
            ParameterChange::YOffset(step(&OFFSET_RANGE, params.open_simplex_offsets.1, scale))
        }
        KeyCode::KeyK => {
            ParameterChange::YOffset(step(&OFFSET_RANGE, params.open_simplex_offsets.1, -scale))
        }
        KeyCode::KeyM => ParameterChange::DistanceMetric(match params.distance_metric {
            DistanceMetric::Euclidean => DistanceMetric::Manhattan,
            DistanceMetric::Manhattan => DistanceMetric::Euclidean,
        }),
        KeyCode::KeyW => ParameterChange::Wireframe(!params.wireframe),
        KeyCode::KeyX => return Some(Action::ToggleAxes),
        KeyCode::KeyR => return Some(Action::Reset),
        KeyCode::F5 => return Some(Action::ReloadConfig),
        KeyCode::Escape => return Some(Action::Quit),
        _ => return None,
    };
    Some(Action::Change(change))
}

fn step(range: &ParamRange, value: f64, steps: f64) -> f64 {
    // Drop float noise so repeated 0.1 steps land on 0.3, not 0.30000000000000004.
    let next = range.clamp(value + range.step * steps);
    (next * 1e6).round() / 1e6
}

fn step_u32(range: &ParamRange, value: u32, steps: f64) -> u32 {
    range.clamp(f64::from(value) + range.step * steps) as u32
}

/// The color after `current` in [`COLOR_CYCLE`]; colors outside the cycle
/// restart it.
fn next_color(current: Color) -> Color {
    let next = COLOR_CYCLE
        .iter()
        .position(|&c| c == current)
        .map_or(0, |i| (i + 1) % COLOR_CYCLE.len());
    COLOR_CYCLE[next]
}
