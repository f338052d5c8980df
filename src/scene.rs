//! The corner vignette, assembled.
//!
//! [`CornerScene`] owns the fixed composition: two matte walls meeting at a
//! 45° convex corner over a wide ground plane, the video strip wrapping the
//! corner, the extruded text on the right wall, and the scroll rig that
//! carries the camera from the wide establishing view down to a head-on
//! framing of the right wall. All layout parameters are constants fixed at
//! construction; the only per-frame work is pumping the video, polling for
//! the text model, and interpolating the camera.

use crate::binder::TexturedSurfaceBinder;
use crate::camera::Camera;
use crate::corner_strip::{StripCache, StripParams};
use crate::geometry::{PendingTextMesh, TriMesh};
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Transform};
use crate::mesh_pass::{Color, DrawCall};
use crate::scroll_rig::{CameraPose, ScrollCameraRig};
use crate::video::VideoTexture;
use crate::wall_layout::WallConfig;
use glam::{Quat, Vec3};

const WALL_COLOR: Color = Color::rgb(0.165, 0.165, 0.251);
const GROUND_COLOR: Color = Color::rgb(0.415, 0.415, 0.502);
const GROUND_SIZE: f32 = 1000.0;
const GROUND_SETBACK: f32 = -2.0;

/// Distance of the text anchor along the right wall from the corner.
const TEXT_DISTANCE: f32 = 2.2;
/// How far the text floats in front of the right wall.
const TEXT_OFFSET: f32 = 0.15;
/// Target height of the loaded text model.
pub(crate) const TEXT_HEIGHT: f32 = 0.5;

/// How far the close camera stands off the right wall.
const CLOSE_DISTANCE: f32 = 1.4;
const CLOSE_FOV: f32 = 32.0;

/// The complete vignette: geometry, materials, and the camera rig.
pub struct CornerScene {
    walls: WallConfig,
    strip_params: StripParams,
    strip_cache: StripCache,
    rig: ScrollCameraRig,
    binder: TexturedSurfaceBinder,

    strip_mesh: Mesh,
    wall_mesh: Mesh,
    ground_mesh: Mesh,

    text_pending: Option<PendingTextMesh>,
    text_mesh: Option<Mesh>,
    text_transform: Transform,
}

impl CornerScene {
    /// Assembles the vignette around a video texture and an optional
    /// still-loading text model.
    pub fn new(gpu: &GpuContext, video: VideoTexture, text: Option<PendingTextMesh>) -> Self {
        let walls = WallConfig::default();
        let strip_params = StripParams::default();

        let mut strip_cache = StripCache::new();
        let strip = strip_cache.get_or_build(&walls, &strip_params);
        let strip_mesh = strip.upload(gpu);

        let wall_mesh = TriMesh::panel(walls.wall_width, walls.wall_height).upload(gpu);
        let ground_mesh = TriMesh::ground(GROUND_SIZE).upload(gpu);

        let rig = ScrollCameraRig::new(Self::wide_pose(), Self::close_pose(&walls));

        let text_transform = Transform::new()
            .position(Self::text_anchor(&walls))
            .rotation(Quat::from_rotation_y(walls.half_angle));

        Self {
            walls,
            strip_params,
            strip_cache,
            rig,
            binder: TexturedSurfaceBinder::new(video),
            strip_mesh,
            wall_mesh,
            ground_mesh,
            text_pending: text,
            text_mesh: None,
            text_transform,
        }
    }

    /// The establishing view: pulled back and slightly above, looking past
    /// the corner.
    pub fn wide_pose() -> CameraPose {
        CameraPose::new(Vec3::new(0.0, 0.5, 5.0), Vec3::new(0.0, 0.0, -0.5), 50.0)
    }

    /// The final view: standing off the right wall along its outward
    /// normal, facing the text head-on.
    pub fn close_pose(walls: &WallConfig) -> CameraPose {
        let anchor = Self::text_anchor(walls);
        CameraPose::new(
            anchor + walls.right_normal() * CLOSE_DISTANCE,
            anchor,
            CLOSE_FOV,
        )
    }

    /// Where the text sits: along the right wall, floated out by its own
    /// offset.
    fn text_anchor(walls: &WallConfig) -> Vec3 {
        walls.right_along() * TEXT_DISTANCE + walls.right_normal() * TEXT_OFFSET
    }

    /// Per-frame upkeep: pump the video, and if the text model just
    /// arrived, project the video across it (once) and upload it.
    ///
    /// Safe to call forever with the text never arriving.
    pub fn advance(&mut self, gpu: &GpuContext, dt: f32) {
        self.binder.update(gpu, dt);

        if let Some(pending) = &mut self.text_pending {
            if let Some(mut mesh) = pending.poll() {
                self.binder.bind_text(&mut mesh);
                self.text_mesh = Some(mesh.upload(gpu));
                self.text_pending = None;
            }
        }
    }

    /// Applies the scroll-interpolated pose to the camera.
    pub fn drive_camera(&self, progress: f32, camera: &mut Camera) {
        self.rig.drive(progress, camera);
    }

    /// The scroll rig, for callers that want raw poses.
    pub fn rig(&self) -> &ScrollCameraRig {
        &self.rig
    }

    /// The wall layout this scene was built around.
    pub fn walls(&self) -> &WallConfig {
        &self.walls
    }

    /// The strip parameters this scene was built around.
    pub fn strip_params(&self) -> &StripParams {
        &self.strip_params
    }

    /// Swaps in new strip parameters and refreshes the GPU mesh.
    ///
    /// Goes through the cache, so re-applying the current parameters is an
    /// upload of the already-built geometry, not a rebuild.
    pub fn set_strip_params(&mut self, gpu: &GpuContext, params: StripParams) {
        self.strip_params = params;
        let strip = self.strip_cache.get_or_build(&self.walls, &self.strip_params);
        self.strip_mesh = strip.upload(gpu);
    }

    /// This frame's renderable surfaces, back to front where it matters.
    pub fn draw_calls(&self) -> Vec<DrawCall<'_>> {
        let mut calls = vec![
            DrawCall {
                mesh: &self.ground_mesh,
                transform: Transform::from_position(Vec3::new(
                    0.0,
                    -self.walls.wall_height * 0.5,
                    GROUND_SETBACK,
                )),
                color: GROUND_COLOR,
                texture: None,
                double_sided: false,
                unlit: false,
            },
            DrawCall {
                mesh: &self.wall_mesh,
                transform: self.walls.left_wall_transform(),
                color: WALL_COLOR,
                texture: None,
                double_sided: false,
                unlit: false,
            },
            DrawCall {
                mesh: &self.wall_mesh,
                transform: self.walls.right_wall_transform(),
                color: WALL_COLOR,
                texture: None,
                double_sided: false,
                unlit: false,
            },
            DrawCall {
                mesh: &self.strip_mesh,
                transform: Transform::new(),
                color: Color::WHITE,
                texture: Some(self.binder.texture()),
                double_sided: true,
                unlit: true,
            },
        ];

        if let Some(text) = &self.text_mesh {
            calls.push(DrawCall {
                mesh: text,
                transform: self.text_transform,
                color: Color::WHITE,
                texture: Some(self.binder.texture()),
                double_sided: false,
                unlit: true,
            });
        }

        calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn close_pose_faces_the_right_wall_head_on() {
        let walls = WallConfig::default();
        let pose = CornerScene::close_pose(&walls);
        let view_dir = (pose.target - pose.position).normalize();
        // Perpendicular approach: looking straight against the outward
        // normal.
        assert!((view_dir + walls.right_normal()).length() < EPS);
    }

    #[test]
    fn close_pose_is_narrower_than_wide() {
        let walls = WallConfig::default();
        assert!(CornerScene::close_pose(&walls).fov_degrees < CornerScene::wide_pose().fov_degrees);
    }

    #[test]
    fn wide_pose_matches_the_establishing_framing() {
        let pose = CornerScene::wide_pose();
        assert_eq!(pose.position, Vec3::new(0.0, 0.5, 5.0));
        assert_eq!(pose.target, Vec3::new(0.0, 0.0, -0.5));
        assert_eq!(pose.fov_degrees, 50.0);
    }

    #[test]
    fn text_anchor_floats_in_front_of_the_right_wall() {
        let walls = WallConfig::default();
        let anchor = CornerScene::text_anchor(&walls);
        // Signed distance from the right wall plane equals the text offset.
        let clearance = anchor.dot(walls.right_normal());
        assert!((clearance - TEXT_OFFSET).abs() < EPS);
    }
}
