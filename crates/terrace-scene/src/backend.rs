//! The seam between scene bookkeeping and whatever owns GPU resources.

use terrace_mesh::{LineVertex, TerrainVertex};
use terrace_terrain::Color;

/// Opaque id of an uploaded vertex (and optional index) buffer set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(pub u64);

/// Opaque id of a created material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u64);

/// How a drawable is shaded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaterialDesc {
    /// Lit solid surface in a uniform color.
    Phong { color: Color, double_sided: bool },
    /// Unlit per-vertex colored lines, multiplied by `opacity`.
    Line { opacity: f32, depth_test: bool },
}

impl MaterialDesc {
    /// Whether the material needs alpha blending.
    pub fn is_transparent(&self) -> bool {
        matches!(self, MaterialDesc::Line { opacity, .. } if *opacity < 1.0)
    }
}

/// Errors a backend reports when it cannot create a resource.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("failed to upload geometry `{label}`: {reason}")]
    GeometryUpload { label: String, reason: String },

    #[error("failed to create material: {reason}")]
    MaterialCreation { reason: String },
}

/// Creates and releases the resources a [`Scene`](crate::Scene) refers to.
///
/// Creation is fallible; release is not, and releasing a handle the backend
/// no longer knows is a no-op.
pub trait RenderBackend {
    /// Upload an indexed triangle list.
    fn upload_mesh(
        &mut self,
        label: &str,
        vertices: &[TerrainVertex],
        indices: &[u32],
    ) -> Result<GeometryHandle, BackendError>;

    /// Upload unindexed line segments (two vertices per segment).
    fn upload_lines(
        &mut self,
        label: &str,
        vertices: &[LineVertex],
    ) -> Result<GeometryHandle, BackendError>;

    fn create_material(&mut self, desc: &MaterialDesc) -> Result<MaterialHandle, BackendError>;

    fn release_geometry(&mut self, handle: GeometryHandle);

    fn release_material(&mut self, handle: MaterialHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_faded_lines_are_transparent() {
        assert!(
            MaterialDesc::Line {
                opacity: 0.25,
                depth_test: false
            }
            .is_transparent()
        );
        assert!(
            !MaterialDesc::Line {
                opacity: 1.0,
                depth_test: true
            }
            .is_transparent()
        );
        assert!(
            !MaterialDesc::Phong {
                color: Color::GREEN,
                double_sided: true
            }
            .is_transparent()
        );
    }

    #[test]
    fn test_backend_error_messages() {
        let err = BackendError::GeometryUpload {
            label: "terrain".into(),
            reason: "out of memory".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to upload geometry `terrain`: out of memory"
        );
    }
}
