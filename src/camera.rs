//! The scene camera: position, look-target, and field of view.
//!
//! The camera is target-based: it is re-aimed at its target every frame
//! rather than carrying a free orientation, because the scroll rig always
//! drives it toward an interpolated look-at point. The projection carries a
//! dirty flag so the renderer can keep its projection matrix cached until
//! the field of view (or the window aspect) actually changes.

use glam::{Mat4, Vec3};

/// A perspective camera aimed at a target point.
#[derive(Clone, Debug)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// World-space point the camera faces.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    projection_dirty: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_3, // 60 degrees
            near: 0.1,
            far: 1000.0,
            projection_dirty: true,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: place the camera.
    pub fn at(mut self, position: impl Into<Vec3>) -> Self {
        self.position = position.into();
        self
    }

    /// Builder: aim the camera.
    pub fn looking_at(mut self, target: impl Into<Vec3>) -> Self {
        self.target = target.into();
        self
    }

    /// Builder: set the field of view in degrees.
    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov = degrees.to_radians();
        self
    }

    /// Moves the camera without changing its target.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Re-aims the camera at a target point.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Sets the field of view, flagging the projection for recomputation
    /// when the value actually changes.
    pub fn set_fov_degrees(&mut self, degrees: f32) {
        let fov = degrees.to_radians();
        if fov != self.fov {
            self.fov = fov;
            self.projection_dirty = true;
        }
    }

    /// Current field of view in degrees.
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// Unit direction from position toward target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    /// World-to-camera matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Camera-to-clip matrix for the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    /// Consumes the projection-dirty flag. The renderer calls this once per
    /// frame and rebuilds its cached projection only on `true`.
    pub fn take_projection_dirty(&mut self) -> bool {
        std::mem::take(&mut self.projection_dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_camera_starts_with_a_dirty_projection() {
        let mut camera = Camera::new();
        assert!(camera.take_projection_dirty());
        assert!(!camera.take_projection_dirty());
    }

    #[test]
    fn fov_change_marks_projection_dirty() {
        let mut camera = Camera::new();
        camera.take_projection_dirty();

        camera.set_fov_degrees(35.0);
        assert!(camera.take_projection_dirty());

        // Same value again: nothing to recompute.
        camera.set_fov_degrees(35.0);
        assert!(!camera.take_projection_dirty());
    }

    #[test]
    fn look_at_orients_forward_toward_target() {
        let mut camera = Camera::new().at(Vec3::new(0.0, 0.0, 5.0));
        camera.look_at(Vec3::new(0.0, 0.0, -1.0));
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn view_matrix_puts_target_on_the_negative_z_axis() {
        let camera = Camera::new()
            .at(Vec3::new(3.0, 1.0, 4.0))
            .looking_at(Vec3::new(0.0, 1.0, 0.0));
        let view = camera.view_matrix();
        let target_in_view = view.transform_point3(camera.target);
        assert!(target_in_view.x.abs() < 1e-5);
        assert!(target_in_view.y.abs() < 1e-5);
        assert!(target_in_view.z < 0.0);
    }
}
