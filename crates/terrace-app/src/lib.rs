//! Terrain viewer application: window and input handling, frame statistics,
//! platform directories, and the headless generate-and-export path.

pub mod controls;
pub mod error;
pub mod frame_stats;
pub mod headless;
pub mod platform;
pub mod window;

pub use error::AppError;
