//! The terrain session: parameters, oracles, scene and backend under one
//! owner, driven by parameter commands.

use terrace_mesh::{axes_helper, light_marker};
use terrace_terrain::{
    ChangeEffect, HeightField, OracleSet, ParameterChange, TerrainParameters, wall_clock_seed,
};
use tracing::{debug, info, warn};

use crate::backend::RenderBackend;
use crate::builder::{RebuildReport, TerrainMeshBuilder, build_line_drawable, release};
use crate::error::SceneError;
use crate::scene::{DrawableId, DrawableKind, Scene};

/// Where fresh oracle seeds come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedSource {
    /// Milliseconds since the Unix epoch at the time of the request.
    WallClock,
    /// `next`, `next + 1`, ... for reproducible runs.
    Sequence { next: u64 },
}

impl SeedSource {
    pub fn sequence(start: u64) -> Self {
        SeedSource::Sequence { next: start }
    }

    pub fn next_seed(&mut self) -> u64 {
        match self {
            SeedSource::WallClock => wall_clock_seed(),
            SeedSource::Sequence { next } => {
                let seed = *next;
                *next = next.wrapping_add(1);
                seed
            }
        }
    }
}

/// Owns everything a running terrain viewer mutates.
///
/// Every edit goes through [`apply`](Self::apply) (or its textual form
/// [`on_parameter_changed`](Self::on_parameter_changed)) and triggers exactly
/// one synchronous rebuild.
pub struct TerrainSession<B: RenderBackend> {
    params: TerrainParameters,
    oracles: OracleSet,
    scene: Scene,
    backend: B,
    builder: TerrainMeshBuilder,
    seeds: SeedSource,
    axes: Option<DrawableId>,
    light_marker: Option<DrawableId>,
    last_report: Option<RebuildReport>,
    stale: bool,
}

impl<B: RenderBackend> TerrainSession<B> {
    /// Seed the oracles, place the light marker, and build the first terrain.
    /// Out-of-range numeric parameters are clamped first.
    pub fn new(
        params: TerrainParameters,
        backend: B,
        mut seeds: SeedSource,
    ) -> Result<Self, SceneError> {
        let params = params.clamped();
        let base_seed = seeds.next_seed();
        info!(seed = base_seed, "starting terrain session");

        let mut session = Self {
            oracles: OracleSet::new(base_seed, params.worley_point_count),
            params,
            scene: Scene::new(),
            backend,
            builder: TerrainMeshBuilder::new(),
            seeds,
            axes: None,
            light_marker: None,
            last_report: None,
            stale: true,
        };

        let light = *session.scene.light();
        let marker = light_marker(light.position, 0.25, [1.0, 1.0, 1.0, 1.0]);
        let drawable = build_line_drawable(
            &mut session.backend,
            "light-marker",
            &marker,
            DrawableKind::LightMarker,
        )?;
        session.light_marker = Some(session.scene.add(drawable));

        session.rebuild()?;
        Ok(session)
    }

    /// Apply one parameter change, clamped to its settings range, then rebuild.
    ///
    /// A changed Worley point count reseeds the Worley oracle first. If the
    /// rebuild fails the parameter keeps its new value, the previous terrain
    /// stays on screen, and [`is_stale`](Self::is_stale) reports `true` until
    /// a later rebuild succeeds.
    pub fn apply(&mut self, change: ParameterChange) -> Result<&RebuildReport, SceneError> {
        let change = change.clamped();
        debug!(%change, "applying parameter change");
        self.apply_without_rebuild(change);
        self.rebuild()
    }

    /// Parse and apply a textual `(field, value)` edit.
    ///
    /// An unparseable edit is rejected before anything changes.
    pub fn on_parameter_changed(
        &mut self,
        field: &str,
        value: &str,
    ) -> Result<&RebuildReport, SceneError> {
        let change = ParameterChange::parse(field, value).map_err(|e| {
            warn!(field, value, error = %e, "rejected parameter change");
            e
        })?;
        self.apply(change)
    }

    /// Apply several changes with a single rebuild. `Ok(None)` when there
    /// was nothing to apply.
    pub fn apply_all(
        &mut self,
        changes: impl IntoIterator<Item = ParameterChange>,
    ) -> Result<Option<&RebuildReport>, SceneError> {
        let mut any = false;
        for change in changes {
            let change = change.clamped();
            debug!(%change, "applying parameter change");
            self.apply_without_rebuild(change);
            any = true;
        }
        if !any {
            return Ok(None);
        }
        self.rebuild().map(Some)
    }

    /// Bring the parameters in line with `target` (e.g. a reloaded config
    /// file), with a single rebuild.
    pub fn replace_parameters(
        &mut self,
        target: &TerrainParameters,
    ) -> Result<Option<&RebuildReport>, SceneError> {
        let changes = self.params.changes_to(target);
        self.apply_all(changes)
    }

    /// Reseed both oracles from the seed source and rebuild.
    pub fn reset(&mut self) -> Result<&RebuildReport, SceneError> {
        let seed = self.seeds.next_seed();
        info!(seed, "resetting noise oracles");
        self.oracles
            .reseed_all(seed, self.params.worley_point_count);
        self.rebuild()
    }

    /// Regenerate the terrain with the current parameters and oracles.
    pub fn rebuild(&mut self) -> Result<&RebuildReport, SceneError> {
        match self.builder.rebuild(
            &self.oracles,
            &self.params,
            &mut self.scene,
            &mut self.backend,
        ) {
            Ok(report) => {
                self.stale = false;
                Ok(&*self.last_report.insert(report))
            }
            Err(e) => {
                self.stale = true;
                warn!(error = %e, "terrain rebuild failed; keeping previous terrain");
                Err(e)
            }
        }
    }

    /// Show or hide the axes overlay, sized from the current plane at the
    /// moment it is shown. Does not rebuild the terrain.
    pub fn set_axes_visible(&mut self, visible: bool) -> Result<(), SceneError> {
        match (visible, self.axes) {
            (true, None) => {
                let size = self.params.axes_size() as f32;
                let drawable = build_line_drawable(
                    &mut self.backend,
                    "axes",
                    &axes_helper(size),
                    DrawableKind::Axes,
                )?;
                self.axes = Some(self.scene.add(drawable));
                debug!(size, "axes shown");
            }
            (false, Some(id)) => {
                self.axes = None;
                if let Some(drawable) = self.scene.remove(id) {
                    release(&mut self.backend, &drawable);
                }
                debug!("axes hidden");
            }
            _ => {}
        }
        Ok(())
    }

    pub fn toggle_axes(&mut self) -> Result<(), SceneError> {
        self.set_axes_visible(self.axes.is_none())
    }

    pub fn axes_visible(&self) -> bool {
        self.axes.is_some()
    }

    pub fn params(&self) -> &TerrainParameters {
        &self.params
    }

    pub fn oracles(&self) -> &OracleSet {
        &self.oracles
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Heights of the terrain currently on screen.
    pub fn heights(&self) -> Option<&HeightField> {
        self.last_report.as_ref().map(|r| &r.heights)
    }

    pub fn last_report(&self) -> Option<&RebuildReport> {
        self.last_report.as_ref()
    }

    /// `true` when the parameters changed but the last rebuild failed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Release every drawable and hand the backend back.
    pub fn into_backend(mut self) -> B {
        self.builder.remove(&mut self.scene, &mut self.backend);
        for id in [self.axes.take(), self.light_marker.take()].into_iter().flatten() {
            if let Some(drawable) = self.scene.remove(id) {
                release(&mut self.backend, &drawable);
            }
        }
        self.backend
    }

    fn apply_without_rebuild(&mut self, change: ParameterChange) {
        if change.apply(&mut self.params) == ChangeEffect::ReseedWorley {
            let seed = self.seeds.next_seed();
            debug!(
                seed,
                points = self.params.worley_point_count,
                "reseeding worley oracle"
            );
            self.oracles
                .reseed_worley(seed, self.params.worley_point_count);
        }
    }
}
