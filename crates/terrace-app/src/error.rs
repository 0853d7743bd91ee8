//! Application-level errors.

use std::path::PathBuf;

use terrace_config::ConfigError;
use terrace_render::RenderContextError;
use terrace_scene::SceneError;

use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("terrain error: {0}")]
    Scene(#[from] SceneError),

    #[error("the session finished without building any terrain")]
    NoTerrain,

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Render(#[from] RenderContextError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to write {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },
}
