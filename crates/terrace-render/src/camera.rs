//! Orbit camera circling a target point.

use glam::{Mat4, Vec3};

use crate::pipeline::CameraUniform;

const MIN_DISTANCE: f32 = 1.0;
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// A perspective camera that orbits `target` at `distance`, parameterized
/// by yaw around +Y and pitch above the XZ plane.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Distance from the target, at least 1.
    pub distance: f32,
    /// Radians around +Y; zero looks from +Z towards the target.
    pub yaw: f32,
    /// Radians above the XZ plane, kept short of the poles.
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    /// Place the eye at `eye`, looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3, fov_degrees: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            target,
            distance: MIN_DISTANCE,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: fov_degrees.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near,
            far: far.max(near + f32::EPSILON),
        };
        camera.set_eye(eye);
        camera
    }

    /// Re-derive yaw, pitch and distance so the eye sits at `eye`.
    pub fn set_eye(&mut self, eye: Vec3) {
        let offset = eye - self.target;
        let distance = offset.length();
        if distance < f32::EPSILON {
            self.distance = MIN_DISTANCE;
            return;
        }
        self.distance = distance.max(MIN_DISTANCE);
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / distance).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// World-space eye position.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// Rotate around the target by the given yaw and pitch deltas in radians.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Scale the distance to the target by `factor`, staying within
    /// `[1, far / 2]`.
    pub fn zoom(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let max = (self.far * 0.5).max(MIN_DISTANCE);
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, max);
    }

    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// Perspective projection with reverse-Z (near and far swapped).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            eye: self.eye().extend(1.0).to_array(),
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 25.0, 40.0), Vec3::ZERO, 70.0, 1.0, 1000.0)
    }
}
