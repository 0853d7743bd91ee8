//! GPU vertex formats and their canonical `wgpu::VertexBufferLayout`s.
//!
//! | Format          | Location | Offset | Format    | Field    |
//! |-----------------|----------|--------|-----------|----------|
//! | `TerrainVertex` | 0        | 0      | Float32x3 | position |
//! |                 | 1        | 12     | Float32x3 | normal   |
//! | `LineVertex`    | 0        | 0      | Float32x3 | position |
//! |                 | 1        | 12     | Float32x4 | color    |

use std::mem;

use glam::Vec3;
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// A lit terrain vertex: 24 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

static_assertions::assert_eq_size!(TerrainVertex, [u8; 24]);

impl TerrainVertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// An unlit, per-vertex colored line vertex: 28 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(LineVertex, [u8; 28]);

impl LineVertex {
    pub fn new(position: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }
}

pub const TERRAIN_VERTEX_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
];

/// Layout shared by every pipeline that draws [`TerrainVertex`] buffers.
pub const TERRAIN_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<TerrainVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &TERRAIN_VERTEX_ATTRIBUTES,
};

pub const LINE_VERTEX_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x4,
        offset: 12,
        shader_location: 1,
    },
];

/// Layout shared by every pipeline that draws [`LineVertex`] buffers.
pub const LINE_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<LineVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &LINE_VERTEX_ATTRIBUTES,
};

const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[1].offset == mem::offset_of!(TerrainVertex, normal) as u64);
const _: () = assert!(LINE_VERTEX_ATTRIBUTES[1].offset == mem::offset_of!(LineVertex, color) as u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strides_match_struct_sizes() {
        assert_eq!(TERRAIN_VERTEX_LAYOUT.array_stride, 24);
        assert_eq!(LINE_VERTEX_LAYOUT.array_stride, 28);
    }

    #[test]
    fn test_shader_locations_are_sequential() {
        for attrs in [&TERRAIN_VERTEX_ATTRIBUTES, &LINE_VERTEX_ATTRIBUTES] {
            for (i, attr) in attrs.iter().enumerate() {
                assert_eq!(attr.shader_location, i as u32);
            }
        }
    }

    #[test]
    fn test_vertices_cast_to_bytes() {
        let verts = [TerrainVertex::new(Vec3::ONE, Vec3::Y); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 72);
    }

    #[test]
    fn test_layouts_are_valid_for_wgpu_pipeline() {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            force_fallback_adapter: true,
            ..Default::default()
        }));

        let Ok(adapter) = adapter else {
            // No adapter on headless CI.
            return;
        };

        let Ok((device, _queue)) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
        else {
            return;
        };

        let shader_source = r#"
            @vertex
            fn vs_terrain(
                @location(0) position: vec3<f32>,
                @location(1) normal: vec3<f32>,
            ) -> @builtin(position) vec4<f32> {
                return vec4<f32>(position + normal * 0.0, 1.0);
            }

            @vertex
            fn vs_line(
                @location(0) position: vec3<f32>,
                @location(1) color: vec4<f32>,
            ) -> @builtin(position) vec4<f32> {
                return vec4<f32>(position, color.a);
            }

            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0, 1.0, 1.0, 1.0);
            }
        "#;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test_vertex_format_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        for (entry, layout, topology) in [
            ("vs_terrain", TERRAIN_VERTEX_LAYOUT, wgpu::PrimitiveTopology::TriangleList),
            ("vs_line", LINE_VERTEX_LAYOUT, wgpu::PrimitiveTopology::LineList),
        ] {
            let _pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(entry),
                layout: None,
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(entry),
                    buffers: &[layout],
                    compilation_options: Default::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: wgpu::TextureFormat::Bgra8UnormSrgb,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                multiview_mask: None,
                cache: None,
            });
        }
    }
}
