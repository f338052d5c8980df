//! Scroll-driven camera interpolation.
//!
//! The rig maps an external scroll-progress signal to a camera pose every
//! frame: a wide establishing view at progress 0 easing into a close view
//! by mid-scroll. There are no timers and no state beyond the two endpoint
//! poses — the rig is a pure function of the current progress value, so
//! scrolling backward reverses the motion and re-invoking with the same
//! progress always yields the same pose.

use crate::camera::Camera;
use glam::Vec3;

/// Easing curves for interpolation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Start slow, accelerate.
    In,
    /// Start fast, decelerate.
    Out,
    /// Zero velocity at both endpoints — the camera drifts in and settles.
    #[default]
    Smoothstep,
}

impl Ease {
    /// Applies the curve to a linear parameter, clamped to [0, 1].
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::In => t * t,
            Ease::Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// A camera endpoint: where it stands, what it faces, how wide it sees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// Camera position.
    pub position: Vec3,
    /// Look-at target.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl CameraPose {
    pub const fn new(position: Vec3, target: Vec3, fov_degrees: f32) -> Self {
        Self {
            position,
            target,
            fov_degrees,
        }
    }
}

/// Interpolates the camera between two fixed poses from a scroll signal.
///
/// The transition finishes at `finish_at` of the full scroll range (half by
/// default), so the tail of the scroll holds the final pose steady.
#[derive(Clone, Copy, Debug)]
pub struct ScrollCameraRig {
    /// Pose at progress 0.
    pub start: CameraPose,
    /// Pose from `finish_at` onward.
    pub end: CameraPose,
    /// Fraction of the scroll range that completes the transition.
    pub finish_at: f32,
    /// Easing curve applied to the normalized transition parameter.
    pub ease: Ease,
}

impl ScrollCameraRig {
    /// A rig between two poses, completing at half scroll with smoothstep
    /// easing.
    pub fn new(start: CameraPose, end: CameraPose) -> Self {
        Self {
            start,
            end,
            finish_at: 0.5,
            ease: Ease::Smoothstep,
        }
    }

    /// Sets the fraction of scroll at which the transition completes.
    pub fn finish_at(mut self, fraction: f32) -> Self {
        assert!(
            fraction > 0.0 && fraction <= 1.0,
            "finish fraction must be in (0, 1]"
        );
        self.finish_at = fraction;
        self
    }

    /// Sets the easing curve.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// The pose for a scroll progress value.
    ///
    /// Progress is clamped to [0, 1]. At or past the endpoints the endpoint
    /// poses are returned as-is, bit for bit, so the establishing and final
    /// framings never drift.
    pub fn pose_at(&self, progress: f32) -> CameraPose {
        let progress = progress.clamp(0.0, 1.0);
        let t = (progress / self.finish_at).min(1.0);
        if t <= 0.0 {
            return self.start;
        }
        if t >= 1.0 {
            return self.end;
        }

        let k = self.ease.apply(t);
        CameraPose {
            position: self.start.position.lerp(self.end.position, k),
            target: self.start.target.lerp(self.end.target, k),
            fov_degrees: self.start.fov_degrees + (self.end.fov_degrees - self.start.fov_degrees) * k,
        }
    }

    /// Applies the pose for `progress` to a live camera: moves it, re-aims
    /// it at the interpolated target, and updates the field of view (which
    /// flags the projection when it changed).
    ///
    /// Re-aiming happens every frame, so anything else that nudges the
    /// camera position still ends up facing the rig's target.
    pub fn drive(&self, progress: f32, camera: &mut Camera) {
        let pose = self.pose_at(progress);
        camera.set_position(pose.position);
        camera.look_at(pose.target);
        camera.set_fov_degrees(pose.fov_degrees);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> ScrollCameraRig {
        ScrollCameraRig::new(
            CameraPose::new(Vec3::new(0.0, 0.5, 5.0), Vec3::new(0.0, 0.0, -0.5), 50.0),
            CameraPose::new(Vec3::new(2.6, 0.0, -0.4), Vec3::new(1.7, 0.0, -1.4), 32.0),
        )
    }

    #[test]
    fn smoothstep_hits_half_at_half() {
        assert_eq!(Ease::Smoothstep.apply(0.0), 0.0);
        assert_eq!(Ease::Smoothstep.apply(1.0), 1.0);
        assert!((Ease::Smoothstep.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ease_clamps_out_of_range_input() {
        assert_eq!(Ease::Smoothstep.apply(-2.0), 0.0);
        assert_eq!(Ease::Smoothstep.apply(3.0), 1.0);
    }

    #[test]
    fn pose_is_exactly_start_at_zero() {
        let rig = rig();
        assert_eq!(rig.pose_at(0.0), rig.start);
        assert_eq!(rig.pose_at(-1.0), rig.start);
    }

    #[test]
    fn pose_is_exactly_end_from_half_scroll_onward() {
        let rig = rig();
        assert_eq!(rig.pose_at(0.5), rig.end);
        assert_eq!(rig.pose_at(0.75), rig.end);
        assert_eq!(rig.pose_at(1.0), rig.end);
        assert_eq!(rig.pose_at(7.0), rig.end);
    }

    #[test]
    fn quarter_scroll_is_the_eased_midpoint() {
        // progress 0.25 → t = 0.5 → smoothstep(0.5) = 0.5: the transition
        // completes by half scroll, verified at its own midpoint.
        let rig = rig();
        let pose = rig.pose_at(0.25);
        let mid = rig.start.position.lerp(rig.end.position, 0.5);
        assert!((pose.position - mid).length() < 1e-5);
        assert!((pose.fov_degrees - 41.0).abs() < 1e-4);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let rig = rig();
        for progress in [0.0, 0.1, 0.33, 0.499, 0.5, 0.9] {
            assert_eq!(rig.pose_at(progress), rig.pose_at(progress));
        }
    }

    #[test]
    fn path_is_continuous_in_small_steps() {
        let rig = rig();
        let steps = 1000;
        let travel = (rig.end.position - rig.start.position).length();
        // Steepest slope of the eased, range-compressed parameter is 3.0
        // (smoothstep peak 1.5 × the 2× progress compression).
        let max_step = 4.0 * travel / steps as f32;

        let mut previous = rig.pose_at(0.0);
        for i in 1..=steps {
            let pose = rig.pose_at(i as f32 / steps as f32);
            assert!((pose.position - previous.position).length() <= max_step);
            assert!((pose.target - previous.target).length() <= max_step);
            previous = pose;
        }
    }

    #[test]
    fn drive_applies_pose_and_flags_projection() {
        let rig = rig();
        let mut camera = Camera::new();
        camera.take_projection_dirty();

        rig.drive(0.25, &mut camera);
        let pose = rig.pose_at(0.25);
        assert_eq!(camera.position, pose.position);
        assert_eq!(camera.target, pose.target);
        assert!((camera.fov_degrees() - pose.fov_degrees).abs() < 1e-4);
        assert!(camera.take_projection_dirty());

        // Holding the same progress leaves the projection clean.
        rig.drive(0.25, &mut camera);
        assert!(!camera.take_projection_dirty());
    }

    #[test]
    fn scrolling_backward_retraces_the_same_path() {
        let rig = rig();
        let forward = rig.pose_at(0.3);
        rig.pose_at(0.45);
        rig.pose_at(0.5);
        let back = rig.pose_at(0.3);
        assert_eq!(forward, back);
    }
}
