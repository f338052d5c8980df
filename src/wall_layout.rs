//! Placement geometry for two walls meeting at a convex corner.
//!
//! The corner edge is the Y axis through the origin. Both walls lean away
//! from the viewer (+Z) by the same half-angle, one to each side, so the
//! corner bulges toward the camera like a street-building corner. All of
//! the strip generator's directional arithmetic (outward normals,
//! along-wall directions, the bend cylinder's center and tangent points)
//! derives from this one configuration.

use crate::mesh::Transform;
use glam::{Quat, Vec3};

/// The two-wall corner: half-angle between each wall and the viewer-facing
/// axis, plus panel dimensions.
///
/// Pure data with pure derivations; fixed for the lifetime of a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallConfig {
    /// Angle between each wall's outward normal and +Z, in radians.
    pub half_angle: f32,
    /// Width of each wall panel.
    pub wall_width: f32,
    /// Height of each wall panel.
    pub wall_height: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            half_angle: std::f32::consts::FRAC_PI_4,
            wall_width: 5.0,
            wall_height: 4.0,
        }
    }
}

impl WallConfig {
    /// A corner with the given half-angle and panel dimensions.
    pub fn new(half_angle: f32, wall_width: f32, wall_height: f32) -> Self {
        Self {
            half_angle,
            wall_width,
            wall_height,
        }
    }

    /// Unit outward normal of the left wall: half-angle to the left of +Z.
    pub fn left_normal(&self) -> Vec3 {
        let (sin, cos) = self.half_angle.sin_cos();
        Vec3::new(-sin, 0.0, cos)
    }

    /// Unit outward normal of the right wall, the left normal mirrored
    /// across the bisector plane (x = 0).
    pub fn right_normal(&self) -> Vec3 {
        let (sin, cos) = self.half_angle.sin_cos();
        Vec3::new(sin, 0.0, cos)
    }

    /// Unit direction along the left wall surface, from the corner edge
    /// away from the viewer.
    pub fn left_along(&self) -> Vec3 {
        let (sin, cos) = self.half_angle.sin_cos();
        Vec3::new(-cos, 0.0, -sin)
    }

    /// Unit direction along the right wall surface, from the corner edge
    /// away from the viewer.
    pub fn right_along(&self) -> Vec3 {
        let (sin, cos) = self.half_angle.sin_cos();
        Vec3::new(cos, 0.0, -sin)
    }

    /// Placement for the left wall panel: its inner vertical edge on the
    /// corner axis, facing the left normal.
    pub fn left_wall_transform(&self) -> Transform {
        Transform::new()
            .position(self.left_along() * (self.wall_width * 0.5))
            .rotation(Quat::from_rotation_y(-self.half_angle))
    }

    /// Placement for the right wall panel, mirroring the left.
    pub fn right_wall_transform(&self) -> Transform {
        Transform::new()
            .position(self.right_along() * (self.wall_width * 0.5))
            .rotation(Quat::from_rotation_y(self.half_angle))
    }

    /// Center of the bend cylinder joining the two wall planes.
    ///
    /// Sits on the bisector behind the corner, at the depth where a
    /// cylinder of `bend_radius` touches both wall planes tangentially:
    /// `bend_radius / cos(half_angle)` (`bend_radius · √2` at 45°).
    pub fn bend_center(&self, bend_radius: f32) -> Vec3 {
        Vec3::new(0.0, 0.0, -bend_radius / self.half_angle.cos())
    }

    /// Distance from the corner, measured along either wall surface, to the
    /// point where the bend cylinder touches it:
    /// `bend_radius · tan(half_angle)` (equal to `bend_radius` at 45°).
    pub fn tangent_distance(&self, bend_radius: f32) -> f32 {
        bend_radius * self.half_angle.tan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn normals_are_unit_length() {
        let walls = WallConfig::default();
        assert!((walls.left_normal().length() - 1.0).abs() < EPS);
        assert!((walls.right_normal().length() - 1.0).abs() < EPS);
        assert!((walls.left_along().length() - 1.0).abs() < EPS);
        assert!((walls.right_along().length() - 1.0).abs() < EPS);
    }

    #[test]
    fn normals_mirror_across_the_bisector() {
        let walls = WallConfig::new(0.6, 5.0, 4.0);
        let l = walls.left_normal();
        let r = walls.right_normal();
        assert!((l.x + r.x).abs() < EPS);
        assert!((l.z - r.z).abs() < EPS);
    }

    #[test]
    fn normals_are_perpendicular_to_their_wall() {
        let walls = WallConfig::new(0.9, 5.0, 4.0);
        assert!(walls.left_normal().dot(walls.left_along()).abs() < EPS);
        assert!(walls.right_normal().dot(walls.right_along()).abs() < EPS);
    }

    #[test]
    fn wall_panels_share_the_corner_edge() {
        let walls = WallConfig::default();
        let hw = walls.wall_width * 0.5;

        // The left panel's +X edge and the right panel's -X edge both land
        // on the corner axis.
        let left_edge = walls
            .left_wall_transform()
            .matrix()
            .transform_point3(Vec3::new(hw, 1.0, 0.0));
        let right_edge = walls
            .right_wall_transform()
            .matrix()
            .transform_point3(Vec3::new(-hw, 1.0, 0.0));

        assert!((left_edge - Vec3::new(0.0, 1.0, 0.0)).length() < EPS);
        assert!((right_edge - Vec3::new(0.0, 1.0, 0.0)).length() < EPS);
    }

    #[test]
    fn walls_extend_away_from_the_viewer() {
        let walls = WallConfig::default();
        assert!(walls.left_wall_transform().position.z < 0.0);
        assert!(walls.right_wall_transform().position.z < 0.0);
    }

    #[test]
    fn bend_center_depth_at_reference_angle() {
        let walls = WallConfig::default();
        let center = walls.bend_center(0.12);
        assert!(center.x.abs() < EPS);
        assert!((center.z + 0.12 * std::f32::consts::SQRT_2).abs() < EPS);
    }

    #[test]
    fn bend_cylinder_touches_both_wall_planes() {
        // At the tangent distance along the wall, the point on the wall
        // plane is exactly bend_radius away from the bend center.
        let walls = WallConfig::new(0.7, 5.0, 4.0);
        let r = 0.25;
        let center = walls.bend_center(r);
        let d = walls.tangent_distance(r);

        let on_left = walls.left_along() * d;
        let on_right = walls.right_along() * d;
        assert!(((on_left - center).length() - r).abs() < EPS);
        assert!(((on_right - center).length() - r).abs() < EPS);
    }

    #[test]
    fn tangent_distance_equals_radius_at_45_degrees() {
        let walls = WallConfig::default();
        assert!((walls.tangent_distance(0.12) - 0.12).abs() < EPS);
    }
}
