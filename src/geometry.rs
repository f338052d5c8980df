//! CPU-side triangle geometry and the pre-extruded text model loader.
//!
//! [`TriMesh`] is the crate's working representation for geometry that is
//! still being built or reshaped: the corner strip generator emits one, the
//! text binder rewrites one's UVs, and [`TriMesh::upload`] turns the final
//! result into a GPU [`Mesh`].
//!
//! The extruded 3D text (the "M-CUBE" lettering on the right wall) is not
//! generated here — it is produced by an external modelling step and
//! consumed as an STL file. [`PendingTextMesh`] loads it off-thread and
//! hands the finished [`TriMesh`] over exactly once, so the scene can keep
//! rendering while (or even if) the model never shows up.

use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};
use glam::Vec3;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Errors from loading the text model.
#[derive(Debug)]
pub enum TextModelError {
    /// File could not be read.
    Io(std::io::Error),
    /// The STL data was invalid or corrupt.
    Parse(String),
    /// The model had no triangles or a degenerate bounding box.
    Degenerate,
}

impl std::fmt::Display for TextModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextModelError::Io(e) => write!(f, "IO error: {}", e),
            TextModelError::Parse(msg) => write!(f, "STL parse error: {}", msg),
            TextModelError::Degenerate => write!(f, "text model has no usable geometry"),
        }
    }
}

impl std::error::Error for TextModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextModelError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TextModelError {
    fn from(e: std::io::Error) -> Self {
        TextModelError::Io(e)
    }
}

/// A triangle mesh on the CPU: vertices plus triangle indices.
///
/// Every index references the vertex list; UVs sit alongside positions in
/// [`Vertex3d`]. Geometry passes (normal recomputation, UV projection,
/// recentering) mutate in place; [`upload`](Self::upload) freezes the
/// result on the GPU.
#[derive(Clone, Debug)]
pub struct TriMesh {
    /// Vertex positions, normals, and UVs.
    pub vertices: Vec<Vertex3d>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
}

impl TriMesh {
    /// Wraps existing vertex and index data.
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// A width × height quad in the XY plane, centered at the origin,
    /// facing +Z. This is the wall surface.
    pub fn panel(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let n = [0.0, 0.0, 1.0];
        let vertices = vec![
            Vertex3d::new([-hw, -hh, 0.0], n, [0.0, 0.0]),
            Vertex3d::new([hw, -hh, 0.0], n, [1.0, 0.0]),
            Vertex3d::new([hw, hh, 0.0], n, [1.0, 1.0]),
            Vertex3d::new([-hw, hh, 0.0], n, [0.0, 1.0]),
        ];
        Self::new(vertices, vec![0, 1, 2, 2, 3, 0])
    }

    /// A size × size quad in the XZ plane, centered at the origin, facing
    /// +Y. This is the ground.
    pub fn ground(size: f32) -> Self {
        let half = size * 0.5;
        let n = [0.0, 1.0, 0.0];
        let vertices = vec![
            Vertex3d::new([-half, 0.0, -half], n, [0.0, 0.0]),
            Vertex3d::new([half, 0.0, -half], n, [1.0, 0.0]),
            Vertex3d::new([half, 0.0, half], n, [1.0, 1.0]),
            Vertex3d::new([-half, 0.0, half], n, [0.0, 1.0]),
        ];
        // Wound counter-clockwise seen from above.
        Self::new(vertices, vec![0, 2, 1, 0, 3, 2])
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }

    /// Size of the bounding box.
    pub fn size(&self) -> Vec3 {
        let (min, max) = self.bounds();
        max - min
    }

    /// Translates every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position[0] += offset.x;
            v.position[1] += offset.y;
            v.position[2] += offset.z;
        }
    }

    /// Scales every vertex uniformly around the origin.
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            v.position[0] *= factor;
            v.position[1] *= factor;
            v.position[2] *= factor;
        }
    }

    /// Moves the bounding-box center to the origin.
    pub fn recenter(&mut self) {
        let center = self.center();
        self.translate(-center);
    }

    /// Uniformly scales so the bounding box is `target` units tall.
    /// Does nothing if the mesh has no vertical extent.
    pub fn scale_to_height(&mut self, target: f32) {
        let height = self.size().y;
        if height > 0.0 {
            self.scale(target / height);
        }
    }

    /// Recomputes smooth vertex normals from the triangulation.
    ///
    /// Face normals are accumulated per vertex weighted by face area (the
    /// cross product's magnitude), then normalized.
    pub fn recalculate_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = [0.0, 0.0, 0.0];
        }

        for tri in self.indices.chunks(3) {
            if tri.len() < 3 {
                continue;
            }
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let p0 = Vec3::from(self.vertices[i0].position);
            let p1 = Vec3::from(self.vertices[i1].position);
            let p2 = Vec3::from(self.vertices[i2].position);
            let face_normal = (p1 - p0).cross(p2 - p0);

            for &i in &[i0, i1, i2] {
                self.vertices[i].normal[0] += face_normal.x;
                self.vertices[i].normal[1] += face_normal.y;
                self.vertices[i].normal[2] += face_normal.z;
            }
        }

        for v in &mut self.vertices {
            let n = Vec3::from(v.normal).normalize_or_zero();
            v.normal = n.into();
        }
    }

    /// Rewrites every UV as the vertex's normalized X/Y position within the
    /// mesh's bounding box — a flat front projection over the whole mesh.
    ///
    /// An axis with no extent maps to the texture's center line instead of
    /// dividing by zero.
    pub fn remap_uvs_to_bounds(&mut self) {
        let (min, max) = self.bounds();
        let size = max - min;
        for v in &mut self.vertices {
            v.uv[0] = if size.x > 0.0 {
                (v.position[0] - min.x) / size.x
            } else {
                0.5
            };
            v.uv[1] = if size.y > 0.0 {
                (v.position[1] - min.y) / size.y
            } else {
                0.5
            };
        }
    }

    /// Uploads this geometry to the GPU.
    pub fn upload(&self, gpu: &GpuContext) -> Mesh {
        Mesh::new(gpu, &self.vertices, &self.indices)
    }
}

/// Parses STL data into a [`TriMesh`], one vertex per face corner with the
/// face normal (STL carries no UVs — they are remapped later).
fn parse_stl<R: std::io::Read + std::io::Seek>(reader: &mut R) -> Result<TriMesh, TextModelError> {
    let stl = stl_io::read_stl(reader).map_err(|e| TextModelError::Parse(e.to_string()))?;

    let mut vertices = Vec::with_capacity(stl.faces.len() * 3);
    let mut indices = Vec::with_capacity(stl.faces.len() * 3);

    for (i, face) in stl.faces.iter().enumerate() {
        let normal: [f32; 3] = face.normal.into();
        for &vertex_idx in &face.vertices {
            let position: [f32; 3] = (stl.vertices[vertex_idx]).into();
            vertices.push(Vertex3d::new(position, normal, [0.0, 0.0]));
        }
        let base = (i * 3) as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    if vertices.is_empty() {
        return Err(TextModelError::Degenerate);
    }

    Ok(TriMesh::new(vertices, indices))
}

/// Loads and normalizes the text model: recentered at the origin and scaled
/// to the requested height, ready for placement on the wall.
fn load_text_model(path: &Path, height: f32) -> Result<TriMesh, TextModelError> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let mut mesh = parse_stl(&mut reader)?;

    if mesh.size().y <= 0.0 {
        return Err(TextModelError::Degenerate);
    }

    mesh.recenter();
    mesh.scale_to_height(height);
    Ok(mesh)
}

enum TextSlot {
    Ready(Option<TriMesh>),
    Loading(mpsc::Receiver<Result<TriMesh, String>>),
    Failed,
}

/// A text mesh that may not have arrived yet.
///
/// [`spawn`](Self::spawn) starts the file load on its own thread and
/// returns immediately; the scene polls every frame. [`poll`](Self::poll)
/// yields the mesh exactly once on the frame it becomes available —
/// thereafter (and before) it returns `None`, so "not ready yet" and
/// "already taken" both read as the same harmless state.
pub struct PendingTextMesh {
    slot: TextSlot,
}

impl PendingTextMesh {
    /// Starts loading an STL text model in the background.
    pub fn spawn(path: PathBuf, height: f32) -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let result = load_text_model(&path, height).map_err(|e| e.to_string());
            // Receiver may have been dropped; nothing to do then.
            let _ = tx.send(result);
        });
        Self {
            slot: TextSlot::Loading(rx),
        }
    }

    /// Wraps geometry that is already available.
    pub fn ready(mesh: TriMesh) -> Self {
        Self {
            slot: TextSlot::Ready(Some(mesh)),
        }
    }

    /// Non-blocking check; yields the mesh exactly once when available.
    pub fn poll(&mut self) -> Option<TriMesh> {
        match &mut self.slot {
            TextSlot::Ready(mesh) => mesh.take(),
            TextSlot::Loading(rx) => match rx.try_recv() {
                Ok(Ok(mesh)) => Some(mesh),
                Ok(Err(e)) => {
                    eprintln!("[text] failed to load model: {}", e);
                    self.slot = TextSlot::Failed;
                    None
                }
                Err(mpsc::TryRecvError::Empty) => None,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.slot = TextSlot::Failed;
                    None
                }
            },
            TextSlot::Failed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> TriMesh {
        TriMesh::panel(2.0, 4.0)
    }

    #[test]
    fn bounds_span_the_panel() {
        let (min, max) = quad().bounds();
        assert_eq!(min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn recenter_moves_center_to_origin() {
        let mut mesh = quad();
        mesh.translate(Vec3::new(3.0, -1.0, 2.0));
        mesh.recenter();
        assert!(mesh.center().length() < 1e-5);
    }

    #[test]
    fn scale_to_height_hits_target() {
        let mut mesh = quad();
        mesh.scale_to_height(1.0);
        assert!((mesh.size().y - 1.0).abs() < 1e-6);
        // Aspect preserved: width scales by the same factor.
        assert!((mesh.size().x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn recalculated_normals_face_out_of_the_panel() {
        let mut mesh = quad();
        for v in &mut mesh.vertices {
            v.normal = [0.0, 0.0, 0.0];
        }
        mesh.recalculate_normals();
        for v in &mesh.vertices {
            let n = Vec3::from(v.normal);
            assert!((n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn ground_winding_faces_up() {
        let mut mesh = TriMesh::ground(10.0);
        for v in &mut mesh.vertices {
            v.normal = [0.0, 0.0, 0.0];
        }
        mesh.recalculate_normals();
        for v in &mesh.vertices {
            assert!((Vec3::from(v.normal) - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn uv_remap_normalizes_to_bounding_box() {
        let mut mesh = quad();
        mesh.translate(Vec3::new(10.0, 20.0, 0.0));
        mesh.remap_uvs_to_bounds();

        // Bottom-left corner → (0, 0), top-right corner → (1, 1).
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[2].uv, [1.0, 1.0]);
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn uv_remap_flat_axis_maps_to_center() {
        // A vertical line segment mesh: no X extent.
        let vertices = vec![
            Vertex3d::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex3d::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex3d::new([0.0, 2.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
        ];
        let mut mesh = TriMesh::new(vertices, vec![0, 1, 2]);
        mesh.remap_uvs_to_bounds();
        for v in &mesh.vertices {
            assert_eq!(v.uv[0], 0.5);
        }
    }

    #[test]
    fn pending_text_delivers_exactly_once() {
        let mut pending = PendingTextMesh::ready(quad());
        assert!(pending.poll().is_some());
        assert!(pending.poll().is_none());
        assert!(pending.poll().is_none());
    }
}
