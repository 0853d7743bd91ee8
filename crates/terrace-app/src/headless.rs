//! Generate terrain without a window and optionally export PNG previews.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use terrace_config::Config;
use terrace_mesh::PlaneGrid;
use terrace_scene::{HeadlessBackend, SeedSource, TerrainSession};
use terrace_terrain::{PreviewImage, wall_clock_seed};
use tracing::info;

use crate::error::AppError;

/// Edge length of the exported Worley preview.
pub const WORLEY_PREVIEW_SIZE: u32 = 100;

/// What a headless run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSummary {
    pub seed: u64,
    pub vertex_count: usize,
    pub primitive_count: usize,
    pub min_height: f64,
    pub max_height: f64,
    pub distinct_levels: usize,
    pub exported: Vec<PathBuf>,
}

/// Files to write after generation.
#[derive(Debug, Clone, Default)]
pub struct ExportTargets {
    pub height_png: Option<PathBuf>,
    pub worley_png: Option<PathBuf>,
}

/// Build the configured terrain once, log its statistics, and write the
/// requested previews.
pub fn run_headless(config: &Config, targets: &ExportTargets) -> Result<HeadlessSummary, AppError> {
    let seed = config.debug.seed.unwrap_or_else(wall_clock_seed);
    let session = TerrainSession::new(
        config.terrain.clone(),
        HeadlessBackend::new(),
        SeedSource::sequence(seed),
    )?;

    let report = session.last_report().ok_or(AppError::NoTerrain)?;
    let heights = &report.heights;
    let min_height = heights.min().unwrap_or(0.0);
    let max_height = heights.max().unwrap_or(0.0);
    let distinct_levels = heights.distinct_levels();
    info!(
        seed,
        noise = %session.params().noise_kind,
        vertices = report.vertex_count,
        primitives = report.primitive_count,
        min = min_height,
        max = max_height,
        levels = distinct_levels,
        elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
        "generated terrain"
    );

    let mut exported = Vec::new();
    if let Some(path) = &targets.height_png {
        let grid = PlaneGrid::from_parameters(session.params());
        let image = heights.to_preview(
            grid.columns() as u32,
            grid.rows() as u32,
            session.params().max_height,
        );
        write_png(path, &image)?;
        info!(path = %path.display(), "wrote height field preview");
        exported.push(path.clone());
    }
    if let Some(path) = &targets.worley_png {
        let field = session
            .oracles()
            .worley()
            .render_field(WORLEY_PREVIEW_SIZE, session.params().distance_metric);
        let image =
            PreviewImage::from_unit_values(WORLEY_PREVIEW_SIZE, WORLEY_PREVIEW_SIZE, &field);
        write_png(path, &image)?;
        info!(path = %path.display(), "wrote worley field preview");
        exported.push(path.clone());
    }

    Ok(HeadlessSummary {
        seed,
        vertex_count: report.vertex_count,
        primitive_count: report.primitive_count,
        min_height,
        max_height,
        distinct_levels,
        exported,
    })
}

/// Encode an RGBA preview as an 8-bit PNG.
pub fn write_png(path: &Path, image: &PreviewImage) -> Result<(), AppError> {
    let export_err = |source: png::EncodingError| AppError::Export {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| export_err(e.into()))?;
    let (width, height) = image.dimensions();
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(export_err)?;
    writer.write_image_data(&image.pixels).map_err(export_err)?;
    writer.finish().map_err(export_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrace_terrain::NoiseKind;

    fn small_config(seed: u64) -> Config {
        let mut config = Config::default();
        config.terrain.grid_segments_x = 8;
        config.terrain.grid_segments_y = 6;
        config.debug.seed = Some(seed);
        config
    }

    fn read_png(path: &Path) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(File::open(path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    #[test]
    fn test_headless_run_is_deterministic() {
        let config = small_config(42);
        let a = run_headless(&config, &ExportTargets::default()).unwrap();
        let b = run_headless(&config, &ExportTargets::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.vertex_count, 9 * 7);
        assert_eq!(a.primitive_count, 8 * 6 * 2);
        assert!(a.min_height >= 0.0);
        assert!(a.max_height <= config.terrain.max_height);
    }

    #[test]
    fn test_quantized_run_has_few_levels() {
        let mut config = small_config(5);
        config.terrain.dither_levels = 3;
        config.terrain.noise_kind = NoiseKind::Worley;
        let summary = run_headless(&config, &ExportTargets::default()).unwrap();
        assert!(summary.distinct_levels <= 3);
    }

    #[test]
    fn test_degenerate_config_file_yields_finite_heights() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(terrace_config::CONFIG_FILE_NAME),
            "(terrain: (noise_kind: Worley, worley_point_count: 0, plane_width: 0.0, \
             grid_segments_x: 8, grid_segments_y: 6), debug: (seed: Some(9)))",
        )
        .unwrap();
        let config = Config::load_or_create(tmp.path()).unwrap();
        let summary = run_headless(&config, &ExportTargets::default()).unwrap();
        assert!(summary.min_height.is_finite() && summary.max_height.is_finite());
        assert!(summary.min_height >= 0.0);
        assert!(summary.max_height <= config.terrain.max_height);
    }

    #[test]
    fn test_exports_match_grid_and_preview_size() {
        let tmp = tempfile::tempdir().unwrap();
        let targets = ExportTargets {
            height_png: Some(tmp.path().join("heights.png")),
            worley_png: Some(tmp.path().join("worley.png")),
        };
        let summary = run_headless(&small_config(1), &targets).unwrap();
        assert_eq!(summary.exported.len(), 2);

        let (info, pixels) = read_png(&tmp.path().join("heights.png"));
        assert_eq!((info.width, info.height), (9, 7));
        assert_eq!(pixels.len(), 9 * 7 * 4);

        let (info, _) = read_png(&tmp.path().join("worley.png"));
        assert_eq!(
            (info.width, info.height),
            (WORLEY_PREVIEW_SIZE, WORLEY_PREVIEW_SIZE)
        );
    }

    #[test]
    fn test_unwritable_path_is_export_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing-dir").join("out.png");
        let err = write_png(&path, &PreviewImage::new(2, 2)).unwrap_err();
        assert!(matches!(err, AppError::Export { .. }));
    }
}
