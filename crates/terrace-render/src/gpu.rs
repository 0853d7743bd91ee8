//! wgpu device setup and the window surface the viewer presents to.

use std::sync::Arc;
use winit::window::Window;

/// Why the viewer could not get a GPU to draw with.
#[derive(Debug, thiserror::Error)]
pub enum RenderContextError {
    #[error("no GPU adapter can present to this window")]
    NoAdapter,

    #[error("GPU device request was refused: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("could not create a surface for the window: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// The adapter reports no texture format for the surface.
    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,
}

/// Frame acquisition failures after the surface has been reconfigured once.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface lost")]
    Lost,

    #[error("out of GPU memory")]
    OutOfMemory,

    /// Skip the frame and try again on the next redraw.
    #[error("timed out waiting for a frame")]
    Timeout,
}

/// Device, queue, and the configured window surface.
pub struct RenderContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
    pub adapter_info: wgpu::AdapterInfo,
}

impl RenderContext {
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let size = window.inner_size();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderContextError::NoAdapter)?;
        let adapter_info = adapter.get_info();
        log::info!(
            "Rendering terrain on {} via {:?}",
            adapter_info.name,
            adapter_info.backend
        );

        // Terrain meshes top out at 301x301 vertices, well inside default limits.
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("terrace-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let surface_config = surface_configuration(&caps, (size.width, size.height), vsync)?;
        surface.configure(&device, &surface_config);
        log::debug!(
            "Surface {}x{} {:?} {:?}",
            surface_config.width,
            surface_config.height,
            surface_config.format,
            surface_config.present_mode
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_format: surface_config.format,
            surface_config,
            adapter_info,
        })
    }

    /// Fit the surface to a new window size; zero extents become 1.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Current surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Next texture to draw into. A lost or outdated surface is reconfigured
    /// and asked once more.
    pub fn acquire_texture(&self) -> Result<wgpu::SurfaceTexture, SurfaceError> {
        let retry = match self.surface.get_current_texture() {
            Ok(texture) => return Ok(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => true,
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(SurfaceError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => return Err(SurfaceError::Timeout),
            Err(wgpu::SurfaceError::Other) => false,
        };
        if !retry {
            log::error!("Surface reported an unrecoverable error");
            return Err(SurfaceError::Lost);
        }
        log::warn!("Surface lost or outdated, reconfiguring");
        self.surface.configure(&self.device, &self.surface_config);
        self.surface
            .get_current_texture()
            .map_err(|_| SurfaceError::Lost)
    }
}

/// [`RenderContext::new`] driven to completion with `pollster`.
pub fn init_render_context_blocking(
    window: Arc<Window>,
    vsync: bool,
) -> Result<RenderContext, RenderContextError> {
    pollster::block_on(RenderContext::new(window, vsync))
}

/// Surface configuration for the given capabilities and window size.
fn surface_configuration(
    caps: &wgpu::SurfaceCapabilities,
    (width, height): (u32, u32),
    vsync: bool,
) -> Result<wgpu::SurfaceConfiguration, RenderContextError> {
    let format =
        select_surface_format(&caps.formats).ok_or(RenderContextError::UnsupportedSurface)?;
    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: select_present_mode(&caps.present_modes, vsync),
        alpha_mode: caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    })
}

/// The terrain shader writes linear color, so an sRGB target is preferred.
fn select_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ]
    .into_iter()
    .find(|f| formats.contains(f))
    .or_else(|| formats.iter().copied().find(|f| f.is_srgb()))
    .or_else(|| formats.first().copied())
}

fn select_present_mode(modes: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    let uncapped = [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate];
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    // Fifo is the one mode every surface must support.
    uncapped
        .into_iter()
        .find(|mode| modes.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}
