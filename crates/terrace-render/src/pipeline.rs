//! Render pipelines: the lit terrain surface and unlit colored lines.
//!
//! Bind groups shared by both pipelines:
//! - `@group(0)` camera ([`CameraUniform`])
//! - terrain: `@group(1)` point light ([`LightUniform`]), `@group(2)` material
//! - lines: `@group(1)` material ([`MaterialUniform`], alpha carries opacity)

use bytemuck::{Pod, Zeroable};
use std::num::NonZeroU64;

use terrace_mesh::{LINE_VERTEX_LAYOUT, TERRAIN_VERTEX_LAYOUT};
use terrace_scene::PointLight;

/// View-projection matrix plus the eye position for specular highlights.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

/// One point light with linear falloff, plus the ambient term.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct LightUniform {
    /// xyz = world position, w unused.
    pub position: [f32; 4],
    /// rgb = color, a = intensity.
    pub color: [f32; 4],
    /// x = range (0 disables falloff), y = ambient.
    pub params: [f32; 4],
}

impl LightUniform {
    pub fn new(light: &PointLight, ambient: f32) -> Self {
        Self {
            position: light.position.extend(1.0).to_array(),
            color: light.color.extend(light.intensity).to_array(),
            params: [light.range, ambient, 0.0, 0.0],
        }
    }
}

/// Surface color for terrain, or an rgba multiplier for lines.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct MaterialUniform {
    pub color: [f32; 4],
}

const CAMERA_UNIFORM_SIZE: u64 = std::mem::size_of::<CameraUniform>() as u64;
const LIGHT_UNIFORM_SIZE: u64 = std::mem::size_of::<LightUniform>() as u64;
const MATERIAL_UNIFORM_SIZE: u64 = std::mem::size_of::<MaterialUniform>() as u64;

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
    size: u64,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size),
            },
            count: None,
        }],
    })
}

/// Bind group layouts shared by every pipeline, so one camera bind group
/// and one material bind group work with all of them.
pub struct BindGroupLayouts {
    pub camera: wgpu::BindGroupLayout,
    pub light: wgpu::BindGroupLayout,
    pub material: wgpu::BindGroupLayout,
}

impl BindGroupLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            camera: uniform_layout(
                device,
                "camera-bgl",
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                CAMERA_UNIFORM_SIZE,
            ),
            light: uniform_layout(
                device,
                "light-bgl",
                wgpu::ShaderStages::FRAGMENT,
                LIGHT_UNIFORM_SIZE,
            ),
            material: uniform_layout(
                device,
                "material-bgl",
                wgpu::ShaderStages::FRAGMENT,
                MATERIAL_UNIFORM_SIZE,
            ),
        }
    }

    /// A uniform buffer plus its bind group for `layout`.
    pub fn uniform_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        contents: &[u8],
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        use wgpu::util::DeviceExt;

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        (buffer, bind_group)
    }
}

/// Lit, double-sided terrain pipeline.
pub struct TerrainPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl TerrainPipeline {
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindGroupLayouts,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("terrain-pipeline-layout"),
            bind_group_layouts: &[&layouts.camera, &layouts.light, &layouts.material],
            immediate_size: 0,
        });

        let depth_stencil = depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::GreaterEqual, // reverse-Z
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("terrain-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[TERRAIN_VERTEX_LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // double-sided
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self { pipeline }
    }
}

/// Alpha-blended line-list pipeline. With `depth_test` off the lines draw
/// over everything and leave the depth buffer untouched.
pub struct LinePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub depth_test: bool,
}

impl LinePipeline {
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindGroupLayouts,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
        depth_test: bool,
    ) -> Self {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line-pipeline-layout"),
            bind_group_layouts: &[&layouts.camera, &layouts.material],
            immediate_size: 0,
        });

        let depth_stencil = depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: depth_test,
            depth_compare: if depth_test {
                wgpu::CompareFunction::GreaterEqual
            } else {
                wgpu::CompareFunction::Always
            },
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let label = if depth_test {
            "line-pipeline"
        } else {
            "line-overlay-pipeline"
        };
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[LINE_VERTEX_LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            depth_test,
        }
    }
}

/// Blinn-Phong terrain shading: one point light, ambient, both faces lit.
pub const TERRAIN_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
};

struct LightUniform {
    position: vec4<f32>,
    color: vec4<f32>,
    params: vec4<f32>,
};

struct MaterialUniform {
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var<uniform> light: LightUniform;

@group(2) @binding(0)
var<uniform> material: MaterialUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(in.position, 1.0);
    out.world_position = in.position;
    out.normal = in.normal;
    return out;
}

const SHININESS: f32 = 30.0;
const SPECULAR: f32 = 0.067;

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front_facing: bool) -> @location(0) vec4<f32> {
    var n = vec3<f32>(0.0, 1.0, 0.0);
    let len = length(in.normal);
    if (len > 0.0) {
        n = in.normal / len;
    }
    if (!front_facing) {
        n = -n;
    }

    let to_light = light.position.xyz - in.world_position;
    let dist = length(to_light);
    let l = to_light / max(dist, 1e-4);
    let v = normalize(camera.eye.xyz - in.world_position);
    let h = normalize(l + v);

    var falloff = 1.0;
    let range = light.params.x;
    if (range > 0.0) {
        falloff = clamp(1.0 - dist / range, 0.0, 1.0);
    }
    let radiance = light.color.rgb * light.color.a * falloff;

    let diffuse = max(dot(n, l), 0.0);
    let specular = pow(max(dot(n, h), 0.0), SHININESS) * SPECULAR;
    let ambient = light.params.y;

    let rgb = material.color.rgb * (ambient + diffuse * radiance) + specular * radiance;
    return vec4<f32>(rgb, 1.0);
}
"#;

/// Per-vertex colored lines, multiplied by the material color.
pub const LINE_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
};

struct MaterialUniform {
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var<uniform> material: MaterialUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color * material.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn create_test_device() -> Option<wgpu::Device> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            let (device, _queue) = adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()?;
            Some(device)
        })
    }

    fn shader(device: &wgpu::Device, source: &str) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test-shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    }

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        assert_eq!(CAMERA_UNIFORM_SIZE, 80);
        assert_eq!(LIGHT_UNIFORM_SIZE, 48);
        assert_eq!(MATERIAL_UNIFORM_SIZE, 16);
    }

    #[test]
    fn test_light_uniform_packs_scene_light() {
        let light = PointLight::default();
        let uniform = LightUniform::new(&light, 0.08);
        assert_eq!(uniform.position, [0.0, 40.0, 30.0, 1.0]);
        assert_eq!(uniform.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(uniform.params, [200.0, 0.08, 0.0, 0.0]);

        let dimmed = PointLight {
            color: Vec3::new(1.0, 0.5, 0.0),
            intensity: 0.5,
            ..light
        };
        assert_eq!(LightUniform::new(&dimmed, 0.0).color, [1.0, 0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_shaders_declare_entry_points() {
        for source in [TERRAIN_SHADER_SOURCE, LINE_SHADER_SOURCE] {
            assert!(source.contains("fn vs_main"));
            assert!(source.contains("fn fs_main"));
        }
    }

    #[test]
    fn test_terrain_pipeline_creation() {
        let Some(device) = create_test_device() else {
            return;
        };
        let layouts = BindGroupLayouts::new(&device);
        let module = shader(&device, TERRAIN_SHADER_SOURCE);
        let _pipeline = TerrainPipeline::new(
            &device,
            &layouts,
            &module,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            Some(wgpu::TextureFormat::Depth32Float),
        );
    }

    #[test]
    fn test_material_bind_group_accepts_uniform() {
        let Some(device) = create_test_device() else {
            return;
        };
        let layouts = BindGroupLayouts::new(&device);
        let uniform = MaterialUniform { color: [1.0; 4] };
        let (buffer, _bind_group) = BindGroupLayouts::uniform_bind_group(
            &device,
            &layouts.material,
            "test-material",
            bytemuck::bytes_of(&uniform),
        );
        assert_eq!(buffer.size(), MATERIAL_UNIFORM_SIZE);
        assert!(buffer.usage().contains(wgpu::BufferUsages::UNIFORM));
    }

    #[test]
    fn test_line_pipeline_variants() {
        let Some(device) = create_test_device() else {
            return;
        };
        let layouts = BindGroupLayouts::new(&device);
        let module = shader(&device, LINE_SHADER_SOURCE);
        for depth_test in [true, false] {
            let pipeline = LinePipeline::new(
                &device,
                &layouts,
                &module,
                wgpu::TextureFormat::Bgra8UnormSrgb,
                Some(wgpu::TextureFormat::Depth32Float),
                depth_test,
            );
            assert_eq!(pipeline.depth_test, depth_test);
        }
    }
}
