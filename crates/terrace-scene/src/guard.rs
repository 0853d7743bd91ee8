//! Scoped acquisition of backend resources.

use terrace_mesh::{LineVertex, TerrainVertex};

use crate::backend::{BackendError, GeometryHandle, MaterialDesc, MaterialHandle, RenderBackend};

/// Wraps a backend while a drawable is being assembled.
///
/// Every resource created through the guard is released when the guard is
/// dropped, unless [`commit`](Self::commit) was called first. An early return
/// through `?` therefore leaves nothing behind.
pub struct ResourceGuard<'a, B: RenderBackend + ?Sized> {
    backend: &'a mut B,
    geometries: Vec<GeometryHandle>,
    materials: Vec<MaterialHandle>,
}

impl<'a, B: RenderBackend + ?Sized> ResourceGuard<'a, B> {
    pub fn new(backend: &'a mut B) -> Self {
        Self {
            backend,
            geometries: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn upload_mesh(
        &mut self,
        label: &str,
        vertices: &[TerrainVertex],
        indices: &[u32],
    ) -> Result<GeometryHandle, BackendError> {
        let handle = self.backend.upload_mesh(label, vertices, indices)?;
        self.geometries.push(handle);
        Ok(handle)
    }

    pub fn upload_lines(
        &mut self,
        label: &str,
        vertices: &[LineVertex],
    ) -> Result<GeometryHandle, BackendError> {
        let handle = self.backend.upload_lines(label, vertices)?;
        self.geometries.push(handle);
        Ok(handle)
    }

    pub fn create_material(&mut self, desc: &MaterialDesc) -> Result<MaterialHandle, BackendError> {
        let handle = self.backend.create_material(desc)?;
        self.materials.push(handle);
        Ok(handle)
    }

    /// Keep everything acquired so far; the caller now owns the handles.
    pub fn commit(mut self) {
        self.geometries.clear();
        self.materials.clear();
    }
}

impl<B: RenderBackend + ?Sized> Drop for ResourceGuard<'_, B> {
    fn drop(&mut self) {
        for handle in self.geometries.drain(..) {
            self.backend.release_geometry(handle);
        }
        for handle in self.materials.drain(..) {
            self.backend.release_material(handle);
        }
    }
}
