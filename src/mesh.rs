//! GPU mesh upload and spatial transforms.
//!
//! - [`Vertex3d`] — the vertex format shared by every surface in the
//!   vignette: position, normal, and UV
//! - [`Mesh`] — GPU-resident geometry (vertex + index buffers), immutable
//!   after upload
//! - [`Transform`] — position, rotation, and scale for placing a mesh in
//!   the scene
//!
//! CPU-side geometry lives in [`crate::geometry::TriMesh`]; call
//! [`TriMesh::upload`](crate::geometry::TriMesh::upload) to turn it into a
//! [`Mesh`].

use crate::gpu::GpuContext;
use glam::{Mat4, Vec3};

/// A vertex with position, normal, and texture coordinates.
///
/// `#[repr(C)]` with bytemuck derives so vertex slices can be cast straight
/// into GPU buffers. 32 bytes per vertex: position at offset 0, normal at
/// 12, uv at 24.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// Position in model space.
    pub position: [f32; 3],
    /// Surface normal (normalized for correct shading).
    pub normal: [f32; 3],
    /// Texture coordinates, in [0, 1] for every mesh this crate builds.
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout for this format: position at shader
    /// location 0, normal at 1, uv at 2.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    /// Creates a vertex from raw components.
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// GPU-resident mesh geometry.
///
/// Holds the vertex and index buffers for one surface. Meshes are immutable
/// after creation; build new geometry and upload again to change shape.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Uploads vertex and index data to the GPU.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

/// Position, rotation, and scale for placing a mesh in the scene.
///
/// Converted to a matrix in the standard scale → rotate → translate order.
///
/// ```
/// use marquee::{Transform, Vec3, Quat};
///
/// let wall = Transform::new()
///     .position(Vec3::new(-1.8, 0.0, -1.8))
///     .rotation(Quat::from_rotation_y(-std::f32::consts::FRAC_PI_4));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    /// World-space translation.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: glam::Quat,
    /// Per-axis scale factors.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: glam::Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform: origin, no rotation, unit scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transform that only translates.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Sets the translation component.
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the rotation component.
    pub fn rotation(mut self, rotation: glam::Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets non-uniform scale factors.
    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the same scale on all axes.
    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// The combined SRT matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn transform_default_is_identity() {
        let m = Transform::new().matrix();
        assert_eq!(m, Mat4::IDENTITY);
    }

    #[test]
    fn transform_applies_rotation_before_translation() {
        let t = Transform::new()
            .position(Vec3::new(1.0, 0.0, 0.0))
            .rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));

        // +X rotated a quarter turn around Y lands on -Z, then translates.
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 0.0, -1.0)).length() < 1e-6);
    }
}
