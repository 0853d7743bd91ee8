//! Configuration for the terrain viewer.
//!
//! Settings persist to disk as a RON file, can be overridden from the command
//! line via clap, and are re-read on demand for hot reload. Unknown fields are
//! ignored and missing fields take their defaults.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, CameraConfig, Config, DebugConfig, RenderConfig, WindowConfig};
pub use error::ConfigError;
