//! Binds the shared video texture to the marquee surfaces.
//!
//! Both the corner strip and the 3D text sample the same video texture. The
//! strip's UVs are correct by construction; the text model arrives with UVs
//! that mean nothing for video mapping, so the binder projects the texture
//! flat across the lettering — once, on the frame the model shows up.

use crate::geometry::TriMesh;
use crate::gpu::GpuContext;
use crate::texture::Texture;
use crate::video::VideoTexture;

/// Owns the video texture and the one-shot text UV projection.
pub struct TexturedSurfaceBinder {
    video: VideoTexture,
    text_uvs_applied: bool,
}

impl TexturedSurfaceBinder {
    /// Wraps the scene's video texture.
    pub fn new(video: VideoTexture) -> Self {
        Self {
            video,
            text_uvs_applied: false,
        }
    }

    /// Pumps the video source; new frames upload into the shared texture.
    pub fn update(&mut self, gpu: &GpuContext, dt: f32) {
        self.video.update(gpu, dt);
    }

    /// The texture every bound surface samples.
    pub fn texture(&self) -> &Texture {
        self.video.texture()
    }

    /// Playback control over the underlying video.
    pub fn video_mut(&mut self) -> &mut VideoTexture {
        &mut self.video
    }

    /// Projects the video flat across the text model's bounding box,
    /// exactly once. Returns whether the projection ran; repeat calls
    /// refuse rather than rewrite.
    pub fn bind_text(&mut self, text: &mut TriMesh) -> bool {
        bind_text_once(&mut self.text_uvs_applied, text)
    }

    /// Whether the text projection has already run.
    pub fn text_bound(&self) -> bool {
        self.text_uvs_applied
    }
}

fn bind_text_once(applied: &mut bool, text: &mut TriMesh) -> bool {
    if *applied {
        return false;
    }
    text.remap_uvs_to_bounds();
    *applied = true;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_projection_runs_exactly_once() {
        let mut applied = false;
        let mut mesh = TriMesh::panel(2.0, 1.0);

        assert!(bind_text_once(&mut applied, &mut mesh));
        let first_pass_uvs: Vec<[f32; 2]> = mesh.vertices.iter().map(|v| v.uv).collect();

        // Mutate the geometry; a second bind must not touch the UVs again.
        mesh.translate(glam::Vec3::new(5.0, 5.0, 0.0));
        assert!(!bind_text_once(&mut applied, &mut mesh));

        let second_pass_uvs: Vec<[f32; 2]> = mesh.vertices.iter().map(|v| v.uv).collect();
        assert_eq!(first_pass_uvs, second_pass_uvs);
    }

    #[test]
    fn text_projection_spans_the_bounding_box() {
        let mut applied = false;
        let mut mesh = TriMesh::panel(3.0, 1.5);
        mesh.translate(glam::Vec3::new(-7.0, 2.0, 0.0));

        bind_text_once(&mut applied, &mut mesh);
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[2].uv, [1.0, 1.0]);
    }
}
