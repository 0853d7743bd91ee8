//! Scene graph of terrain drawables, the render-backend seam, and the
//! terrain session that turns parameter commands into rebuilds.

pub mod backend;
pub mod builder;
pub mod error;
pub mod guard;
pub mod headless;
pub mod scene;
pub mod session;

pub use backend::{BackendError, GeometryHandle, MaterialDesc, MaterialHandle, RenderBackend};
pub use builder::{RebuildReport, TerrainMeshBuilder, WIREFRAME_COLOR, WIREFRAME_OPACITY};
pub use error::SceneError;
pub use guard::ResourceGuard;
pub use headless::{FailPoint, GeometryRecord, HeadlessBackend};
pub use scene::{Drawable, DrawableId, DrawableKind, PointLight, Scene};
pub use session::{SeedSource, TerrainSession};
