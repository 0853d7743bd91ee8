//! wgpu rendering for the terrain viewer: device setup, lit terrain and line
//! pipelines, the orbit camera, and a GPU implementation of the scene backend.

pub mod backend;
pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipeline;

pub use backend::GpuBackend;
pub use buffer::{BufferAllocator, GpuGeometry, LineBuffer, MeshBuffer};
pub use camera::OrbitCamera;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder, clear_color_from_rgb};
pub use pipeline::{
    BindGroupLayouts, CameraUniform, LINE_SHADER_SOURCE, LightUniform, LinePipeline,
    MaterialUniform, TERRAIN_SHADER_SOURCE, TerrainPipeline,
};
