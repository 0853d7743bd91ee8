//! In-memory [`RenderBackend`] for headless runs and tests.

use std::collections::BTreeMap;

use terrace_mesh::{LineVertex, TerrainVertex};

use crate::backend::{BackendError, GeometryHandle, MaterialDesc, MaterialHandle, RenderBackend};

/// What the headless backend remembers about an uploaded geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryRecord {
    Mesh {
        label: String,
        vertex_count: usize,
        index_count: usize,
    },
    Lines {
        label: String,
        vertex_count: usize,
    },
}

/// Operation that fails once after [`HeadlessBackend::inject_failure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailPoint {
    MeshUpload,
    LineUpload,
    Material,
}

/// Tracks live resources without touching a GPU.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    geometries: BTreeMap<GeometryHandle, GeometryRecord>,
    materials: BTreeMap<MaterialHandle, MaterialDesc>,
    next_handle: u64,
    released_geometries: usize,
    released_materials: usize,
    fail_next: Option<FailPoint>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next operation of kind `point` fail.
    pub fn inject_failure(&mut self, point: FailPoint) {
        self.fail_next = Some(point);
    }

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&GeometryRecord> {
        self.geometries.get(&handle)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialDesc> {
        self.materials.get(&handle)
    }

    pub fn live_geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn released_geometry_count(&self) -> usize {
        self.released_geometries
    }

    pub fn released_material_count(&self) -> usize {
        self.released_materials
    }

    fn take_failure(&mut self, point: FailPoint) -> bool {
        if self.fail_next == Some(point) {
            self.fail_next = None;
            true
        } else {
            false
        }
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl RenderBackend for HeadlessBackend {
    fn upload_mesh(
        &mut self,
        label: &str,
        vertices: &[TerrainVertex],
        indices: &[u32],
    ) -> Result<GeometryHandle, BackendError> {
        if self.take_failure(FailPoint::MeshUpload) {
            return Err(BackendError::GeometryUpload {
                label: label.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        let handle = GeometryHandle(self.next_handle());
        self.geometries.insert(
            handle,
            GeometryRecord::Mesh {
                label: label.to_string(),
                vertex_count: vertices.len(),
                index_count: indices.len(),
            },
        );
        Ok(handle)
    }

    fn upload_lines(
        &mut self,
        label: &str,
        vertices: &[LineVertex],
    ) -> Result<GeometryHandle, BackendError> {
        if self.take_failure(FailPoint::LineUpload) {
            return Err(BackendError::GeometryUpload {
                label: label.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        let handle = GeometryHandle(self.next_handle());
        self.geometries.insert(
            handle,
            GeometryRecord::Lines {
                label: label.to_string(),
                vertex_count: vertices.len(),
            },
        );
        Ok(handle)
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> Result<MaterialHandle, BackendError> {
        if self.take_failure(FailPoint::Material) {
            return Err(BackendError::MaterialCreation {
                reason: "injected failure".to_string(),
            });
        }
        let handle = MaterialHandle(self.next_handle());
        self.materials.insert(handle, *desc);
        Ok(handle)
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        if self.geometries.remove(&handle).is_some() {
            self.released_geometries += 1;
        }
    }

    fn release_material(&mut self, handle: MaterialHandle) {
        if self.materials.remove(&handle).is_some() {
            self.released_materials += 1;
        }
    }
}
