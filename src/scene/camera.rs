//! Orbit camera for the plane view
//!
//! Spherical-coordinate camera orbiting a target point, with ray
//! construction for pointer picking.

use glam::{Mat4, Vec2, Vec3};

use crate::plane::Ray;
use crate::settings::CameraSettings;

/// Pitch limit in radians (~80 degrees)
const PITCH_LIMIT: f32 = 1.4;
/// Closest zoom distance
const MIN_DISTANCE: f32 = 1.0;

/// Orbit camera looking at a target point
pub struct OrbitCamera {
    /// Horizontal angle (yaw) in radians
    yaw: f32,
    /// Vertical angle (pitch) in radians, clamped to avoid gimbal lock
    pitch: f32,
    /// Distance from target point
    distance: f32,
    /// Point the camera orbits around
    target: Vec3,
    /// Aspect ratio (width/height) for projection
    aspect: f32,
    /// Field of view in radians
    fov: f32,
    near: f32,
    far: f32,
    /// Zoom limits
    min_distance: f32,
    max_distance: f32,
    /// Initial distance, restored by `reset`
    home_distance: f32,
}

impl OrbitCamera {
    /// Create a camera on the +Z axis looking at the origin
    pub fn new(settings: &CameraSettings) -> Self {
        let far = settings.far.max(settings.near + f32::EPSILON);
        // A short far plane must not invert the zoom range
        let max_distance = (far * 0.5).max(MIN_DISTANCE);
        let distance = settings.distance.clamp(MIN_DISTANCE, max_distance);
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance,
            target: Vec3::ZERO,
            aspect: 16.0 / 9.0,
            fov: settings.fov_degrees.clamp(1.0, 179.0).to_radians(),
            near: settings.near,
            far,
            min_distance: MIN_DISTANCE,
            max_distance,
            home_distance: distance,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Calculate camera position from spherical coordinates
    pub fn eye_position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Ray from the eye through a point in normalized device coordinates.
    ///
    /// `ndc` is in [-1, 1] on both axes with +Y up.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection_matrix().inverse();
        // wgpu clip space depth runs from 0 (near) to 1 (far)
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }

    /// Handle mouse drag for orbit
    pub fn on_mouse_drag(&mut self, delta: (f32, f32), sensitivity: f32) {
        self.yaw -= delta.0 * sensitivity;
        self.pitch = (self.pitch + delta.1 * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Handle right-drag for pan.
    ///
    /// Moves the target in the view plane so the point under the cursor
    /// follows it at the target's depth. `viewport_height` is in pixels.
    pub fn on_pan(&mut self, delta: (f32, f32), viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let units_per_pixel = 2.0 * self.distance * (self.fov * 0.5).tan() / viewport_height;
        let view = self.view_matrix();
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        self.target += (-delta.0 * right + delta.1 * up) * units_per_pixel;
    }

    /// Handle scroll for zoom
    pub fn on_scroll(&mut self, delta: f32) {
        // Multiplicative zoom for smooth feel
        self.distance =
            (self.distance * (1.0 - delta * 0.1)).clamp(self.min_distance, self.max_distance);
    }

    /// Update aspect ratio on resize
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Reset camera to its initial position
    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.distance = self.home_distance;
        self.target = Vec3::ZERO;
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(&CameraSettings::default())
    }
}
