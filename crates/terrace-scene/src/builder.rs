//! Regenerates the terrain drawable from the current parameters.

use std::time::{Duration, Instant};

use terrace_mesh::{PlaneGrid, TerrainMesh};
use terrace_terrain::{HeightField, HeightFieldGenerator, OracleSet, TerrainParameters};
use tracing::{debug, info};

use crate::backend::{BackendError, MaterialDesc, RenderBackend};
use crate::error::SceneError;
use crate::guard::ResourceGuard;
use crate::scene::{Drawable, DrawableId, DrawableKind, Scene};

/// Line color of the terrain wireframe.
pub const WIREFRAME_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Opacity of the terrain wireframe material.
pub const WIREFRAME_OPACITY: f32 = 0.25;

/// Summary of one successful rebuild.
#[derive(Clone, Debug)]
pub struct RebuildReport {
    pub kind: DrawableKind,
    pub vertex_count: usize,
    /// Triangles for a solid mesh, segments for a wireframe.
    pub primitive_count: usize,
    pub heights: HeightField,
    pub elapsed: Duration,
}

/// Owns the terrain drawable and replaces it wholesale on every rebuild.
///
/// At most one terrain drawable exists at a time, either a solid mesh or a
/// wireframe.
#[derive(Debug, Default)]
pub struct TerrainMeshBuilder {
    current: Option<DrawableId>,
}

impl TerrainMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The terrain drawable currently in the scene.
    pub fn current(&self) -> Option<DrawableId> {
        self.current
    }

    /// Generate heights, build geometry, acquire backend resources, and only
    /// then swap the new drawable in for the old one.
    ///
    /// On error the scene is untouched and any resource acquired for the new
    /// drawable has been released.
    pub fn rebuild<B: RenderBackend + ?Sized>(
        &mut self,
        oracles: &OracleSet,
        params: &TerrainParameters,
        scene: &mut Scene,
        backend: &mut B,
    ) -> Result<RebuildReport, SceneError> {
        let start = Instant::now();

        let grid = PlaneGrid::from_parameters(params);
        let heights = HeightFieldGenerator::new(oracles, params).generate(&grid.planar_positions());
        let mesh = TerrainMesh::build(&grid, heights.heights())?;

        let mut guard = ResourceGuard::new(backend);
        let (drawable, primitive_count) = if params.wireframe {
            let lines = mesh.wireframe(WIREFRAME_COLOR);
            let geometry = guard.upload_lines("terrain-wireframe", lines.vertices())?;
            let material = guard.create_material(&MaterialDesc::Line {
                opacity: WIREFRAME_OPACITY,
                depth_test: false,
            })?;
            let drawable = Drawable {
                kind: DrawableKind::Wireframe,
                geometry,
                material,
            };
            (drawable, lines.segment_count())
        } else {
            let geometry = guard.upload_mesh("terrain", &mesh.to_vertices(), mesh.indices())?;
            let material = guard.create_material(&MaterialDesc::Phong {
                color: params.color,
                double_sided: true,
            })?;
            let drawable = Drawable {
                kind: DrawableKind::SolidMesh,
                geometry,
                material,
            };
            (drawable, mesh.triangle_count())
        };
        guard.commit();

        self.remove(scene, backend);
        self.current = Some(scene.add(drawable));

        let report = RebuildReport {
            kind: drawable.kind,
            vertex_count: mesh.vertex_count(),
            primitive_count,
            heights,
            elapsed: start.elapsed(),
        };
        info!(
            kind = ?report.kind,
            noise = %params.noise_kind,
            vertices = report.vertex_count,
            primitives = report.primitive_count,
            elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
            "terrain rebuilt"
        );
        Ok(report)
    }

    /// Take the terrain drawable out of the scene and release its resources.
    pub fn remove<B: RenderBackend + ?Sized>(&mut self, scene: &mut Scene, backend: &mut B) {
        let Some(id) = self.current.take() else {
            return;
        };
        if let Some(old) = scene.remove(id) {
            release(backend, &old);
            debug!(kind = ?old.kind, "released previous terrain drawable");
        }
    }
}

/// Release both resources of a drawable that has left the scene.
pub(crate) fn release<B: RenderBackend + ?Sized>(backend: &mut B, drawable: &Drawable) {
    backend.release_geometry(drawable.geometry);
    backend.release_material(drawable.material);
}

/// Upload a line set with its material as one drawable, or nothing.
pub(crate) fn build_line_drawable<B: RenderBackend + ?Sized>(
    backend: &mut B,
    label: &str,
    lines: &terrace_mesh::LineSet,
    kind: DrawableKind,
) -> Result<Drawable, BackendError> {
    let mut guard = ResourceGuard::new(backend);
    let geometry = guard.upload_lines(label, lines.vertices())?;
    let material = guard.create_material(&MaterialDesc::Line {
        opacity: 1.0,
        depth_test: true,
    })?;
    guard.commit();
    Ok(Drawable {
        kind,
        geometry,
        material,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{FailPoint, GeometryRecord, HeadlessBackend};

    fn small_params() -> TerrainParameters {
        TerrainParameters {
            grid_segments_x: 4,
            grid_segments_y: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_solid_rebuild_adds_one_mesh() {
        let oracles = OracleSet::new(1, 10);
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let mut builder = TerrainMeshBuilder::new();

        let report = builder
            .rebuild(&oracles, &small_params(), &mut scene, &mut backend)
            .unwrap();

        assert_eq!(report.kind, DrawableKind::SolidMesh);
        assert_eq!(report.vertex_count, 20);
        assert_eq!(report.primitive_count, 24);
        assert_eq!(scene.count(DrawableKind::SolidMesh), 1);
        let drawable = scene.get(builder.current().unwrap()).unwrap();
        assert_eq!(
            backend.geometry(drawable.geometry),
            Some(&GeometryRecord::Mesh {
                label: "terrain".into(),
                vertex_count: 20,
                index_count: 72
            })
        );
    }

    #[test]
    fn test_wireframe_rebuild_has_no_solid_mesh() {
        let oracles = OracleSet::new(1, 10);
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let mut builder = TerrainMeshBuilder::new();
        let params = TerrainParameters {
            wireframe: true,
            ..small_params()
        };

        builder
            .rebuild(&oracles, &small_params(), &mut scene, &mut backend)
            .unwrap();
        let report = builder
            .rebuild(&oracles, &params, &mut scene, &mut backend)
            .unwrap();

        assert_eq!(report.kind, DrawableKind::Wireframe);
        assert_eq!(scene.count(DrawableKind::Wireframe), 1);
        assert_eq!(scene.count(DrawableKind::SolidMesh), 0);
        assert_eq!(backend.live_geometry_count(), 1);
        assert_eq!(backend.live_material_count(), 1);
        let material = backend
            .material(scene.get(builder.current().unwrap()).unwrap().material)
            .unwrap();
        assert_eq!(
            *material,
            MaterialDesc::Line {
                opacity: WIREFRAME_OPACITY,
                depth_test: false
            }
        );
    }

    #[test]
    fn test_replaced_drawable_resources_are_released() {
        let oracles = OracleSet::new(1, 10);
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let mut builder = TerrainMeshBuilder::new();

        for _ in 0..5 {
            builder
                .rebuild(&oracles, &small_params(), &mut scene, &mut backend)
                .unwrap();
        }
        assert_eq!(scene.len(), 1);
        assert_eq!(backend.live_geometry_count(), 1);
        assert_eq!(backend.released_geometry_count(), 4);
        assert_eq!(backend.released_material_count(), 4);
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_drawable() {
        let oracles = OracleSet::new(1, 10);
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let mut builder = TerrainMeshBuilder::new();

        builder
            .rebuild(&oracles, &small_params(), &mut scene, &mut backend)
            .unwrap();
        let before = builder.current();
        let drawable = *scene.get(before.unwrap()).unwrap();

        backend.inject_failure(FailPoint::Material);
        let result = builder.rebuild(&oracles, &small_params(), &mut scene, &mut backend);

        assert!(matches!(result, Err(SceneError::Backend(_))));
        assert_eq!(builder.current(), before);
        assert_eq!(scene.get(before.unwrap()), Some(&drawable));
        // The mesh uploaded before the failure was released again.
        assert_eq!(backend.live_geometry_count(), 1);
        assert_eq!(backend.live_material_count(), 1);
        assert!(backend.geometry(drawable.geometry).is_some());
    }

    #[test]
    fn test_failed_wireframe_upload_keeps_solid_mesh() {
        let oracles = OracleSet::new(1, 10);
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let mut builder = TerrainMeshBuilder::new();

        builder
            .rebuild(&oracles, &small_params(), &mut scene, &mut backend)
            .unwrap();
        backend.inject_failure(FailPoint::LineUpload);
        let params = TerrainParameters {
            wireframe: true,
            ..small_params()
        };
        assert!(builder.rebuild(&oracles, &params, &mut scene, &mut backend).is_err());
        assert_eq!(scene.count(DrawableKind::SolidMesh), 1);
        assert_eq!(scene.count(DrawableKind::Wireframe), 0);
    }

    #[test]
    fn test_remove_releases_and_clears() {
        let oracles = OracleSet::new(1, 10);
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let mut builder = TerrainMeshBuilder::new();
        builder
            .rebuild(&oracles, &small_params(), &mut scene, &mut backend)
            .unwrap();

        builder.remove(&mut scene, &mut backend);
        assert!(builder.current().is_none());
        assert!(scene.is_empty());
        assert_eq!(backend.live_geometry_count(), 0);
    }
}
