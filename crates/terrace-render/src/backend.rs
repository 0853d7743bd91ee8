//! [`RenderBackend`] implementation that owns real wgpu resources.

use std::collections::HashMap;

use terrace_mesh::{LineVertex, TerrainVertex};
use terrace_scene::{
    BackendError, GeometryHandle, MaterialDesc, MaterialHandle, RenderBackend, Scene,
};

use crate::buffer::{BufferAllocator, GpuGeometry};
use crate::camera::OrbitCamera;
use crate::depth::DepthBuffer;
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::pipeline::{
    BindGroupLayouts, CameraUniform, LINE_SHADER_SOURCE, LightUniform, LinePipeline,
    MaterialUniform, TERRAIN_SHADER_SOURCE, TerrainPipeline,
};

struct GpuMaterial {
    desc: MaterialDesc,
    _buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Uploads scene geometry and materials to the GPU and draws a [`Scene`].
pub struct GpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layouts: BindGroupLayouts,
    terrain_pipeline: TerrainPipeline,
    line_pipeline: LinePipeline,
    overlay_pipeline: LinePipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    ambient: f32,
    geometries: HashMap<GeometryHandle, GpuGeometry>,
    materials: HashMap<MaterialHandle, GpuMaterial>,
    next_handle: u64,
}

impl GpuBackend {
    /// Build pipelines for `surface_format` with a [`DepthBuffer`] attachment.
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        ambient: f32,
    ) -> Self {
        let layouts = BindGroupLayouts::new(&device);
        let depth_format = Some(DepthBuffer::FORMAT);

        let terrain_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("terrain-shader"),
            source: wgpu::ShaderSource::Wgsl(TERRAIN_SHADER_SOURCE.into()),
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line-shader"),
            source: wgpu::ShaderSource::Wgsl(LINE_SHADER_SOURCE.into()),
        });

        let terrain_pipeline = TerrainPipeline::new(
            &device,
            &layouts,
            &terrain_shader,
            surface_format,
            depth_format,
        );
        let line_pipeline = LinePipeline::new(
            &device,
            &layouts,
            &line_shader,
            surface_format,
            depth_format,
            true,
        );
        let overlay_pipeline = LinePipeline::new(
            &device,
            &layouts,
            &line_shader,
            surface_format,
            depth_format,
            false,
        );

        let camera = OrbitCamera::default().to_uniform();
        let (camera_buffer, camera_bind_group) = BindGroupLayouts::uniform_bind_group(
            &device,
            &layouts.camera,
            "camera-uniform",
            bytemuck::bytes_of(&camera),
        );
        let light = LightUniform::new(&Default::default(), ambient);
        let (light_buffer, light_bind_group) = BindGroupLayouts::uniform_bind_group(
            &device,
            &layouts.light,
            "light-uniform",
            bytemuck::bytes_of(&light),
        );

        log::info!("GPU backend ready ({surface_format:?})");

        Self {
            device,
            queue,
            layouts,
            terrain_pipeline,
            line_pipeline,
            overlay_pipeline,
            camera_buffer,
            camera_bind_group,
            light_buffer,
            light_bind_group,
            ambient,
            geometries: HashMap::new(),
            materials: HashMap::new(),
            next_handle: 0,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Bytes of vertex and index data currently uploaded.
    pub fn geometry_bytes(&self) -> u64 {
        self.geometries.values().map(GpuGeometry::byte_size).sum()
    }

    /// Upload this frame's camera and the scene light.
    pub fn prepare(&self, scene: &Scene, camera: &OrbitCamera) {
        let camera: CameraUniform = camera.to_uniform();
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera));
        let light = LightUniform::new(scene.light(), self.ambient);
        self.queue
            .write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(&light));
    }

    /// Record draw calls for every drawable: opaque ones first, then the
    /// transparent ones, each group in scene order.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, scene: &Scene) {
        for transparent in [false, true] {
            for (id, drawable) in scene.iter() {
                let (Some(geometry), Some(material)) = (
                    self.geometries.get(&drawable.geometry),
                    self.materials.get(&drawable.material),
                ) else {
                    log::warn!("drawable {id:?} refers to released resources; skipped");
                    continue;
                };
                if material.desc.is_transparent() != transparent {
                    continue;
                }

                match (geometry, material.desc) {
                    (GpuGeometry::Mesh(mesh), MaterialDesc::Phong { .. }) => {
                        render_pass.set_pipeline(&self.terrain_pipeline.pipeline);
                        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                        render_pass.set_bind_group(1, &self.light_bind_group, &[]);
                        render_pass.set_bind_group(2, &material.bind_group, &[]);
                        mesh.bind(render_pass);
                        mesh.draw(render_pass);
                    }
                    (GpuGeometry::Lines(lines), MaterialDesc::Line { depth_test, .. }) => {
                        let pipeline = if depth_test {
                            &self.line_pipeline
                        } else {
                            &self.overlay_pipeline
                        };
                        render_pass.set_pipeline(&pipeline.pipeline);
                        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                        render_pass.set_bind_group(1, &material.bind_group, &[]);
                        lines.bind(render_pass);
                        lines.draw(render_pass);
                    }
                    _ => log::warn!("drawable {id:?} pairs geometry with an incompatible material"),
                }
            }
        }
    }

    /// Draw `scene` into the frame, clearing color and depth first.
    pub fn render(
        &self,
        frame: &mut FrameEncoder,
        depth: &DepthBuffer,
        clear_color: wgpu::Color,
        scene: &Scene,
        camera: &OrbitCamera,
    ) {
        self.prepare(scene, camera);
        let builder = RenderPassBuilder::new()
            .clear_color(clear_color)
            .depth(depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("terrain-pass");
        if let Some(mut pass) = frame.begin_render_pass(&builder) {
            self.draw(&mut pass, scene);
        }
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn check_buffer_size(&self, label: &str, bytes: usize) -> Result<(), BackendError> {
        let max = self.device.limits().max_buffer_size;
        if bytes == 0 {
            return Err(BackendError::GeometryUpload {
                label: label.to_string(),
                reason: "geometry is empty".to_string(),
            });
        }
        if bytes as u64 > max {
            return Err(BackendError::GeometryUpload {
                label: label.to_string(),
                reason: format!("{bytes} bytes exceeds the device buffer limit of {max}"),
            });
        }
        Ok(())
    }
}

impl RenderBackend for GpuBackend {
    fn upload_mesh(
        &mut self,
        label: &str,
        vertices: &[TerrainVertex],
        indices: &[u32],
    ) -> Result<GeometryHandle, BackendError> {
        self.check_buffer_size(label, std::mem::size_of_val(vertices))?;
        self.check_buffer_size(label, std::mem::size_of_val(indices))?;
        let mesh = BufferAllocator::new(&self.device)
            .create_mesh(label, vertices, indices)
            .ok_or_else(|| BackendError::GeometryUpload {
                label: label.to_string(),
                reason: "too many indices".to_string(),
            })?;

        let handle = GeometryHandle(self.next_handle());
        self.geometries.insert(handle, GpuGeometry::Mesh(mesh));
        log::debug!(
            "uploaded mesh `{label}`: {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );
        Ok(handle)
    }

    fn upload_lines(
        &mut self,
        label: &str,
        vertices: &[LineVertex],
    ) -> Result<GeometryHandle, BackendError> {
        self.check_buffer_size(label, std::mem::size_of_val(vertices))?;
        let lines = BufferAllocator::new(&self.device)
            .create_lines(label, vertices)
            .ok_or_else(|| BackendError::GeometryUpload {
                label: label.to_string(),
                reason: "too many vertices".to_string(),
            })?;

        let handle = GeometryHandle(self.next_handle());
        self.geometries.insert(handle, GpuGeometry::Lines(lines));
        log::debug!("uploaded lines `{label}`: {} vertices", vertices.len());
        Ok(handle)
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> Result<MaterialHandle, BackendError> {
        let uniform = match *desc {
            MaterialDesc::Phong { color, .. } => MaterialUniform {
                color: color.to_linear_rgba(),
            },
            MaterialDesc::Line { opacity, .. } => {
                if !(0.0..=1.0).contains(&opacity) {
                    return Err(BackendError::MaterialCreation {
                        reason: format!("line opacity {opacity} is outside [0, 1]"),
                    });
                }
                MaterialUniform {
                    color: [1.0, 1.0, 1.0, opacity],
                }
            }
        };
        let (buffer, bind_group) = BindGroupLayouts::uniform_bind_group(
            &self.device,
            &self.layouts.material,
            "material-uniform",
            bytemuck::bytes_of(&uniform),
        );

        let handle = MaterialHandle(self.next_handle());
        self.materials.insert(
            handle,
            GpuMaterial {
                desc: *desc,
                _buffer: buffer,
                bind_group,
            },
        );
        Ok(handle)
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        if let Some(geometry) = self.geometries.remove(&handle) {
            match geometry {
                GpuGeometry::Mesh(mesh) => {
                    mesh.vertex_buffer.destroy();
                    mesh.index_buffer.destroy();
                }
                GpuGeometry::Lines(lines) => lines.vertex_buffer.destroy(),
            }
        }
    }

    fn release_material(&mut self, handle: MaterialHandle) {
        self.materials.remove(&handle);
    }
}
