//! Reverse-Z depth: the near plane maps to 1.0 and the far plane to 0.0, which
//! keeps precision across the 1..1000 range the orbit camera uses.

/// Depth attachment that tracks the surface size.
pub struct DepthBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    extent: wgpu::Extent3d,
}

impl DepthBuffer {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    pub const CLEAR_VALUE: f32 = 0.0;
    pub const COMPARE_FUNCTION: wgpu::CompareFunction = wgpu::CompareFunction::GreaterEqual;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let extent = Self::extent(width, height);
        let texture = device.create_texture(&Self::descriptor(extent));
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("terrain-depth-view"),
            ..Default::default()
        });
        Self {
            texture,
            view,
            extent,
        }
    }

    /// Recreate the texture when the surface size actually changed.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if Self::extent(width, height) != self.extent {
            *self = Self::new(device, width, height);
        }
    }

    pub fn width(&self) -> u32 {
        self.extent.width
    }

    pub fn height(&self) -> u32 {
        self.extent.height
    }

    fn extent(width: u32, height: u32) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        }
    }

    fn descriptor(size: wgpu::Extent3d) -> wgpu::TextureDescriptor<'static> {
        wgpu::TextureDescriptor {
            label: Some("terrain-depth"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        }
    }
}
