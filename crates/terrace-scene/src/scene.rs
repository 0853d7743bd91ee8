//! Flat scene graph: the drawables currently on screen plus the light.

use glam::Vec3;

use crate::backend::{GeometryHandle, MaterialHandle};

/// Stable id of a drawable within one [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(u64);

/// What a drawable represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawableKind {
    /// The shaded terrain surface.
    SolidMesh,
    /// The terrain as transparent line segments.
    Wireframe,
    /// The RGB axes overlay.
    Axes,
    /// Small cross marking the point light.
    LightMarker,
}

/// A geometry/material pair placed in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Drawable {
    pub kind: DrawableKind,
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
}

/// A point light with linear falloff to zero at `range`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 40.0, 30.0),
            color: Vec3::ONE,
            intensity: 1.0,
            range: 200.0,
        }
    }
}

/// Drawables in insertion order. Removing a drawable hands it back so the
/// caller can release its resources.
#[derive(Debug, Default)]
pub struct Scene {
    drawables: Vec<(DrawableId, Drawable)>,
    next_id: u64,
    light: PointLight,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, drawable: Drawable) -> DrawableId {
        let id = DrawableId(self.next_id);
        self.next_id += 1;
        self.drawables.push((id, drawable));
        id
    }

    /// Take a drawable out of the scene. `None` if it was not present.
    pub fn remove(&mut self, id: DrawableId) -> Option<Drawable> {
        let pos = self.drawables.iter().position(|(d, _)| *d == id)?;
        Some(self.drawables.remove(pos).1)
    }

    pub fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.drawables
            .iter()
            .find(|(d, _)| *d == id)
            .map(|(_, drawable)| drawable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DrawableId, &Drawable)> {
        self.drawables.iter().map(|(id, d)| (*id, d))
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Number of drawables of `kind`.
    pub fn count(&self, kind: DrawableKind) -> usize {
        self.drawables.iter().filter(|(_, d)| d.kind == kind).count()
    }

    pub fn light(&self) -> &PointLight {
        &self.light
    }

    pub fn set_light(&mut self, light: PointLight) {
        self.light = light;
    }
}
