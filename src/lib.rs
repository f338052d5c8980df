//! # marquee
//!
//! **A scroll-driven 3D vignette: a video marquee that wraps a building
//! corner.**
//!
//! Two angled walls meet at a convex corner. A continuous video surface
//! flows along the left wall, bends smoothly around the corner edge, and
//! continues onto the right wall, where extruded 3D lettering carries the
//! same footage. Scrolling eases the camera from a wide establishing view
//! down to a head-on framing of the right wall.
//!
//! ## Quick start
//!
//! ```no_run
//! use marquee::{VignetteConfig, run};
//!
//! fn main() {
//!     run(VignetteConfig::default());
//! }
//! ```
//!
//! ## The pieces
//!
//! - [`WallConfig`] — the corner layout: two walls at a half-angle off the
//!   viewer axis, with the bend cylinder's center and tangent points
//!   derived from it
//! - [`build_corner_strip`] / [`StripCache`] — the seamless strip mesh
//!   (flat → arc → flat) with a monotonic horizontal UV, built once and
//!   memoized
//! - [`TexturedSurfaceBinder`] — one video texture shared by the strip and
//!   the text, including the one-shot flat UV projection over the lettering
//! - [`ScrollCameraRig`] — scroll progress in, eased camera pose out;
//!   stateless and reversible
//! - [`CornerScene`] — the assembled vignette, producing draw calls for the
//!   render pass
//!
//! Everything is plain data in, plain data out; the window shell in
//! [`run`] is one way to drive it, not the only one.

mod app;
mod binder;
mod camera;
mod corner_strip;
mod geometry;
mod gpu;
mod input;
mod mesh;
mod mesh_pass;
mod scene;
mod scroll_rig;
mod texture;
mod video;
mod wall_layout;

pub use app::{VignetteConfig, run};
pub use binder::TexturedSurfaceBinder;
pub use camera::Camera;
pub use corner_strip::{StripCache, StripParams, build_corner_strip};
pub use geometry::{PendingTextMesh, TextModelError, TriMesh};
pub use gpu::GpuContext;
pub use input::ScrollTracker;
pub use mesh::{Mesh, Transform, Vertex3d};
pub use mesh_pass::{Color, DrawCall, MeshPass};
pub use scene::CornerScene;
pub use scroll_rig::{CameraPose, Ease, ScrollCameraRig};
pub use texture::Texture;
pub use video::{FrameSource, ImageSequence, TestPattern, VideoConfig, VideoError, VideoTexture};
pub use wall_layout::WallConfig;

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
