//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]: it owns the GPU
//! context, the orbit camera, and the [`TerrainSession`] that turns key
//! presses into terrain rebuilds.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use terrace_config::Config;
use terrace_render::{
    DepthBuffer, FrameEncoder, GpuBackend, OrbitCamera, RenderContext, SurfaceError,
    clear_color_from_rgb, init_render_context_blocking,
};
use terrace_scene::{SeedSource, TerrainSession};
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{ModifiersState, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::controls::{Action, action_for_key};
use crate::error::AppError;
use crate::frame_stats::FrameStats;

/// Pixels per wheel "line" for touchpad deltas.
const PIXELS_PER_LINE: f64 = 40.0;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Build the starting camera from the config.
pub fn camera_from_config(config: &Config) -> OrbitCamera {
    let camera = &config.camera;
    OrbitCamera::looking_at(
        Vec3::from_array(camera.position),
        Vec3::ZERO,
        camera.fov_degrees,
        camera.near,
        camera.far,
    )
}

/// GPU-side state, created once the window exists.
struct Viewer {
    window: Arc<Window>,
    gpu: RenderContext,
    depth: DepthBuffer,
    session: TerrainSession<GpuBackend>,
}

/// Application state that manages the window, GPU context, and terrain.
pub struct AppState {
    config: Config,
    config_dir: Option<PathBuf>,
    camera: OrbitCamera,
    viewer: Option<Viewer>,
    modifiers: ModifiersState,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
    stats: FrameStats,
    error: Option<AppError>,
}

impl AppState {
    /// `config_dir` is where F5 reloads `config.ron` from.
    pub fn new(config: Config, config_dir: Option<PathBuf>) -> Self {
        Self {
            camera: camera_from_config(&config),
            config,
            config_dir,
            viewer: None,
            modifiers: ModifiersState::empty(),
            dragging: false,
            last_cursor: None,
            stats: FrameStats::new(Instant::now()),
            error: None,
        }
    }

    fn create_viewer(&mut self, event_loop: &ActiveEventLoop) -> Result<Viewer, AppError> {
        let attributes = window_attributes_from_config(&self.config);
        let window = Arc::new(event_loop.create_window(attributes)?);

        let gpu = init_render_context_blocking(window.clone(), self.config.window.vsync)?;
        let (width, height) = gpu.size();
        let depth = DepthBuffer::new(&gpu.device, width, height);
        self.camera.set_aspect_ratio(width as f32, height as f32);

        let backend = GpuBackend::new(
            gpu.device.clone(),
            gpu.queue.clone(),
            gpu.surface_format,
            self.config.render.ambient,
        );
        let seeds = match self.config.debug.seed {
            Some(seed) => SeedSource::sequence(seed),
            None => SeedSource::WallClock,
        };
        let mut session = TerrainSession::new(self.config.terrain.clone(), backend, seeds)?;
        if self.config.debug.show_axes {
            session.set_axes_visible(true)?;
        }
        info!("Viewer ready at {width}x{height}");

        Ok(Viewer {
            window,
            gpu,
            depth,
            session,
        })
    }

    fn handle_action(&mut self, action: Action, event_loop: &ActiveEventLoop) {
        if action == Action::Quit {
            event_loop.exit();
            return;
        }
        if action == Action::ReloadConfig {
            self.reload_config();
            return;
        }
        let Some(viewer) = &mut self.viewer else {
            return;
        };
        let result = match action {
            Action::Change(change) => viewer.session.apply(change).map(|report| {
                info!(
                    %change,
                    vertices = report.vertex_count,
                    elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
                    "terrain rebuilt"
                );
            }),
            Action::ToggleAxes => viewer.session.toggle_axes(),
            Action::Reset => viewer.session.reset().map(|_| info!("terrain reseeded")),
            Action::ReloadConfig | Action::Quit => Ok(()),
        };
        if let Err(e) = result {
            warn!("Terrain update failed, keeping the previous terrain: {e}");
        }
        viewer.window.request_redraw();
    }

    fn reload_config(&mut self) {
        let Some(dir) = &self.config_dir else {
            warn!("No config directory; reload ignored");
            return;
        };
        let new_config = match self.config.reload(dir) {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!("Config unchanged");
                return;
            }
            Err(e) => {
                warn!("Config reload failed: {e}");
                return;
            }
        };

        if let Some(viewer) = &mut self.viewer {
            if let Err(e) = viewer.session.replace_parameters(&new_config.terrain) {
                warn!("Rebuild after reload failed: {e}");
            }
            if new_config.debug.show_axes != self.config.debug.show_axes
                && let Err(e) = viewer.session.set_axes_visible(new_config.debug.show_axes)
            {
                warn!("Axes update after reload failed: {e}");
            }
            viewer.window.request_redraw();
        }
        self.config = new_config;
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(viewer) = &mut self.viewer else {
            return;
        };
        viewer.gpu.resize(width, height);
        let (width, height) = viewer.gpu.size();
        viewer.depth.resize(&viewer.gpu.device, width, height);
        self.camera.set_aspect_ratio(width as f32, height as f32);
        info!("Window resized to {width}x{height}");
    }

    fn render(&mut self) {
        let Some(viewer) = &self.viewer else {
            return;
        };
        let texture = match viewer.gpu.acquire_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => return,
            Err(e) => {
                error!("Failed to acquire surface texture: {e}");
                return;
            }
        };

        let mut frame = FrameEncoder::new(&viewer.gpu.device, viewer.gpu.queue.clone(), texture);
        viewer.session.backend().render(
            &mut frame,
            &viewer.depth,
            clear_color_from_rgb(self.config.render.clear_color),
            viewer.session.scene(),
            &self.camera,
        );
        frame.submit();

        if let Some(fps) = self.stats.record_frame(Instant::now())
            && self.config.debug.show_fps
        {
            info!("{fps:.1} fps");
        }
    }

    fn on_cursor_moved(&mut self, x: f64, y: f64) {
        if self.dragging
            && let Some((last_x, last_y)) = self.last_cursor
        {
            let sensitivity = self.config.camera.orbit_sensitivity;
            self.camera.orbit(
                -(x - last_x) as f32 * sensitivity,
                (y - last_y) as f32 * sensitivity,
            );
            self.request_redraw();
        }
        self.last_cursor = Some((x, y));
    }

    fn on_scroll(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => f64::from(y),
            MouseScrollDelta::PixelDelta(pos) => pos.y / PIXELS_PER_LINE,
        };
        let factor = (1.0 - self.config.camera.zoom_speed as f64).powf(lines);
        self.camera.zoom(factor as f32);
        self.request_redraw();
    }

    fn request_redraw(&self) {
        if let Some(viewer) = &self.viewer {
            viewer.window.request_redraw();
        }
    }

    /// Error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }

    /// Apply one textual parameter edit, as the settings panel would.
    pub fn on_parameter_changed(&mut self, field: &str, value: &str) {
        if let Some(viewer) = &mut self.viewer
            && let Err(e) = viewer.session.on_parameter_changed(field, value)
        {
            warn!("Edit {field}={value} not applied: {e}");
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        match self.create_viewer(event_loop) {
            Ok(viewer) => {
                viewer.window.request_redraw();
                self.viewer = Some(viewer);
            }
            Err(e) => {
                error!("Startup failed: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.viewer.as_ref().map(|v| v.window.inner_size()) {
                    self.resize(size.width, size.height);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let Some(params) = self.viewer.as_ref().map(|v| v.session.params()) else {
                    return;
                };
                if let Some(action) = action_for_key(code, self.modifiers.shift_key(), params) {
                    self.handle_action(action, event_loop);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => {
                self.dragging = false;
                self.last_cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => self.on_scroll(delta),
            WindowEvent::RedrawRequested => {
                self.render();
                // Continuous redraw keeps the frame counter meaningful.
                self.request_redraw();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = self.viewer.take() {
            let backend = viewer.session.into_backend();
            info!(
                geometries = backend.geometry_count(),
                materials = backend.material_count(),
                "released terrain resources"
            );
        }
    }
}

/// Open the window and run until it is closed.
pub fn run_with_config(config: Config, config_dir: Option<PathBuf>) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, config_dir);
    event_loop.run_app(&mut app)?;
    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_from_config_uses_position() {
        let config = Config::default();
        let camera = camera_from_config(&config);
        assert!((camera.eye() - Vec3::new(0.0, 25.0, 40.0)).length() < 1e-3);
        assert!((camera.fov_y - 70f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.near, 1.0);
        assert_eq!(camera.far, 1000.0);
    }

    #[test]
    fn test_app_state_starts_without_viewer() {
        let mut app = AppState::new(Config::default(), None);
        assert!(app.viewer.is_none());
        assert!(app.take_error().is_none());
        // Edits before the window exists are ignored.
        app.on_parameter_changed("maxHeight", "12");
        app.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        assert!(app.camera.distance < camera_from_config(&Config::default()).distance);
    }

    #[test]
    fn test_drag_orbits_camera() {
        let mut app = AppState::new(Config::default(), None);
        let yaw = app.camera.yaw;
        app.on_cursor_moved(100.0, 100.0);
        app.on_cursor_moved(150.0, 100.0);
        assert_eq!(app.camera.yaw, yaw);

        app.dragging = true;
        app.on_cursor_moved(200.0, 100.0);
        assert_ne!(app.camera.yaw, yaw);
    }
}
