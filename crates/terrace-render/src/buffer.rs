//! Vertex and index buffers for terrain meshes and line sets.

use terrace_mesh::{LineVertex, TerrainVertex};

/// An indexed triangle mesh on the GPU.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    /// Bind vertex and index buffers to a render pass.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Unindexed line-list vertices on the GPU.
pub struct LineBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl LineBuffer {
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

/// Either kind of uploaded geometry.
pub enum GpuGeometry {
    Mesh(MeshBuffer),
    Lines(LineBuffer),
}

impl GpuGeometry {
    /// Bytes held on the GPU by this geometry.
    pub fn byte_size(&self) -> u64 {
        match self {
            GpuGeometry::Mesh(mesh) => mesh.vertex_buffer.size() + mesh.index_buffer.size(),
            GpuGeometry::Lines(lines) => lines.vertex_buffer.size(),
        }
    }
}

/// Creates vertex and index buffers on one device.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload a terrain mesh. Returns `None` when either slice is empty,
    /// since wgpu rejects zero-sized buffers.
    pub fn create_mesh(
        &self,
        label: &str,
        vertices: &[TerrainVertex],
        indices: &[u32],
    ) -> Option<MeshBuffer> {
        if vertices.is_empty() || indices.is_empty() {
            return None;
        }
        let vertex_buffer = self.create_vertex_buffer(
            &format!("{label}-vertices"),
            bytemuck::cast_slice(vertices),
        );
        let index_buffer = self.create_index_buffer_u32(&format!("{label}-indices"), indices);
        Some(MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: u32::try_from(indices.len()).ok()?,
        })
    }

    /// Upload line-list vertices. Returns `None` for an empty slice.
    pub fn create_lines(&self, label: &str, vertices: &[LineVertex]) -> Option<LineBuffer> {
        if vertices.is_empty() {
            return None;
        }
        let vertex_buffer = self.create_vertex_buffer(
            &format!("{label}-vertices"),
            bytemuck::cast_slice(vertices),
        );
        Some(LineBuffer {
            vertex_buffer,
            vertex_count: u32::try_from(vertices.len()).ok()?,
        })
    }

    /// Create a vertex buffer from raw byte data.
    pub fn create_vertex_buffer(&self, label: &str, data: &[u8]) -> wgpu::Buffer {
        use wgpu::util::DeviceExt;

        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    /// Create a u32 index buffer.
    pub fn create_index_buffer_u32(&self, label: &str, data: &[u32]) -> wgpu::Buffer {
        use wgpu::util::DeviceExt;

        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            })
    }
}
