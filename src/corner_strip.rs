//! The corner strip: one seamless video surface spanning two walls.
//!
//! The strip starts flat against the left wall, wraps around the convex
//! corner on a cylindrical bend, and ends flat on the right wall, floating
//! a constant offset in front of the wall surfaces. It is generated as a
//! single column-by-column grid so the horizontal texture coordinate runs
//! monotonically from the far left edge to the far right edge — the video
//! flows across the bend with no visible seam.
//!
//! Geometry is pure arithmetic over [`WallConfig`] and [`StripParams`];
//! building is comparatively expensive and the result never changes for a
//! fixed parameter set, so [`StripCache`] memoizes the built mesh by its
//! exact parameter bits.

use crate::geometry::TriMesh;
use crate::mesh::Vertex3d;
use crate::wall_layout::WallConfig;
use std::rc::Rc;

/// Shape parameters for the corner strip.
///
/// Lengths are measured along the wall surfaces from the corner edge.
/// Segment counts control tessellation per region: the flats, the bend arc,
/// and the vertical subdivision. Flat and height counts must be at least 1;
/// an empty bend (`arc_segs == 0`) is allowed and collapses the strip to a
/// hard crease at the corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripParams {
    /// Distance the strip floats in front of the wall surfaces.
    pub offset: f32,
    /// How far the strip reaches along the left wall.
    pub left_extent: f32,
    /// How far the strip continues onto the right wall. Shorter than the
    /// left reach: the corner, not the right wall, is the focal feature.
    pub right_extent: f32,
    /// Radius of the cylindrical bend at the corner.
    pub bend_radius: f32,
    /// Vertical size of the strip, centered on y = 0.
    pub height: f32,
    /// Columns across the left flat region.
    pub left_segs: u32,
    /// Columns across the bend arc.
    pub arc_segs: u32,
    /// Columns across the right flat region.
    pub right_segs: u32,
    /// Rows across the strip height.
    pub height_segs: u32,
}

impl Default for StripParams {
    fn default() -> Self {
        Self {
            offset: 0.08,
            left_extent: 3.5,
            right_extent: 0.6,
            bend_radius: 0.12,
            height: 2.8,
            left_segs: 32,
            arc_segs: 12,
            right_segs: 12,
            height_segs: 8,
        }
    }
}

impl StripParams {
    fn total_cols(&self) -> u32 {
        self.left_segs + self.arc_segs + self.right_segs
    }
}

/// Builds the strip mesh: positions, monotonic UVs, triangle indices, and
/// smooth normals.
///
/// The column loop walks three regions. Each region parametrizes its own
/// boundary columns, and the regions are laid out so those boundaries
/// coincide:
///
/// - **Left flat** — wall distance runs from `left_extent` down to the bend
///   tangent, positioned along the wall and pushed out by `offset` along
///   the wall normal.
/// - **Bend arc** — sweeps from `90° + half_angle` down to `90° − half_angle`
///   around the bend cylinder's center, on a radius of
///   `bend_radius + offset` so the arc keeps the same clearance from the
///   wall surfaces as the flats. The sweep endpoints land exactly on the
///   flats' near ends, tangentially.
/// - **Right flat** — mirrors the left, from the tangent out to
///   `right_extent`.
///
/// With `arc_segs == 0` the flats instead run all the way to the line where
/// the two offset surfaces intersect, so the strip stays positionally
/// connected (a sharp crease instead of a rounded bend).
///
/// # Panics
///
/// Panics on invalid parameters: non-positive bend radius, extents, or
/// height; zero flat/height segment counts; negative offset; or a bend so
/// large its tangent point falls outside either flat extent. These are
/// configuration errors, not runtime states.
pub fn build_corner_strip(walls: &WallConfig, params: &StripParams) -> TriMesh {
    assert!(params.bend_radius > 0.0, "bend radius must be positive");
    assert!(params.offset >= 0.0, "offset must not be negative");
    assert!(
        params.left_extent > 0.0 && params.right_extent > 0.0 && params.height > 0.0,
        "extents and height must be positive"
    );
    assert!(
        params.left_segs >= 1 && params.right_segs >= 1 && params.height_segs >= 1,
        "flat and height segment counts must be at least 1"
    );

    let near_d = if params.arc_segs > 0 {
        let d = walls.tangent_distance(params.bend_radius);
        assert!(
            d < params.left_extent && d < params.right_extent,
            "bend tangent must sit inside both flat extents"
        );
        d
    } else {
        // No arc columns: extend both flats to the crease where the two
        // offset surfaces intersect, so the boundary columns coincide.
        -params.offset * walls.half_angle.tan()
    };

    let total_cols = params.total_cols();
    let row_count = params.height_segs + 1;
    let arc_radius = params.bend_radius + params.offset;
    let bend_center = walls.bend_center(params.bend_radius);
    let sweep_start = std::f32::consts::FRAC_PI_2 + walls.half_angle;
    let sweep = 2.0 * walls.half_angle;

    let mut vertices = Vec::with_capacity(((total_cols + 1) * row_count) as usize);

    for col in 0..=total_cols {
        let (px, pz) = if col <= params.left_segs {
            let t = col as f32 / params.left_segs as f32;
            let d = params.left_extent - t * (params.left_extent - near_d);
            let p = walls.left_along() * d + walls.left_normal() * params.offset;
            (p.x, p.z)
        } else if col <= params.left_segs + params.arc_segs {
            let arc_t = (col - params.left_segs) as f32 / params.arc_segs as f32;
            let angle = sweep_start - arc_t * sweep;
            (
                arc_radius * angle.cos(),
                bend_center.z + arc_radius * angle.sin(),
            )
        } else {
            let t = (col - params.left_segs - params.arc_segs) as f32 / params.right_segs as f32;
            let d = near_d + t * (params.right_extent - near_d);
            let p = walls.right_along() * d + walls.right_normal() * params.offset;
            (p.x, p.z)
        };

        let u = col as f32 / total_cols as f32;
        for row in 0..row_count {
            let v = row as f32 / params.height_segs as f32;
            let y = (v - 0.5) * params.height;
            vertices.push(Vertex3d::new([px, y, pz], [0.0, 0.0, 0.0], [u, v]));
        }
    }

    let mut indices = Vec::with_capacity((total_cols * params.height_segs * 6) as usize);
    for col in 0..total_cols {
        for row in 0..params.height_segs {
            let a = col * row_count + row;
            let b = a + 1;
            let c = a + row_count;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, c]);
            indices.extend_from_slice(&[b, d, c]);
        }
    }

    let mut mesh = TriMesh::new(vertices, indices);
    mesh.recalculate_normals();
    mesh
}

/// Bit-exact memoization key: the parameter floats by their raw bits plus
/// the segment counts and the half-angle the strip was built against.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct StripKey {
    half_angle: u32,
    floats: [u32; 5],
    segs: [u32; 4],
}

impl StripKey {
    fn new(walls: &WallConfig, params: &StripParams) -> Self {
        Self {
            half_angle: walls.half_angle.to_bits(),
            floats: [
                params.offset.to_bits(),
                params.left_extent.to_bits(),
                params.right_extent.to_bits(),
                params.bend_radius.to_bits(),
                params.height.to_bits(),
            ],
            segs: [
                params.left_segs,
                params.arc_segs,
                params.right_segs,
                params.height_segs,
            ],
        }
    }
}

/// Single-entry cache for the built strip.
///
/// The strip is immutable once built and rebuilding it every frame would be
/// pure waste, so the scene asks the cache instead of the builder. The
/// cached mesh is shared out as an `Rc`; a changed key drops the old entry
/// and rebuilds.
#[derive(Default)]
pub struct StripCache {
    entry: Option<(StripKey, Rc<TriMesh>)>,
}

impl StripCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized strip, building it only when the parameters
    /// differ from the cached entry's.
    pub fn get_or_build(&mut self, walls: &WallConfig, params: &StripParams) -> Rc<TriMesh> {
        let key = StripKey::new(walls, params);
        if let Some((cached_key, mesh)) = &self.entry {
            if *cached_key == key {
                return Rc::clone(mesh);
            }
        }
        let mesh = Rc::new(build_corner_strip(walls, params));
        self.entry = Some((key, Rc::clone(&mesh)));
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const EPS: f32 = 1e-5;

    fn reference() -> (WallConfig, StripParams) {
        (WallConfig::default(), StripParams::default())
    }

    /// Position of a column's bottom row vertex.
    fn column_pos(mesh: &TriMesh, params: &StripParams, col: u32) -> Vec3 {
        let row_count = params.height_segs + 1;
        Vec3::from(mesh.vertices[(col * row_count) as usize].position)
    }

    #[test]
    fn vertex_and_index_counts() {
        let (walls, params) = reference();
        let mesh = build_corner_strip(&walls, &params);

        let cols = params.left_segs + params.arc_segs + params.right_segs + 1;
        let rows = params.height_segs + 1;
        assert_eq!(mesh.vertices.len(), (cols * rows) as usize);
        assert_eq!(
            mesh.indices.len(),
            (2 * (cols - 1) * params.height_segs * 3) as usize
        );
        for &i in &mesh.indices {
            assert!((i as usize) < mesh.vertices.len());
        }
    }

    #[test]
    fn regions_join_without_a_seam() {
        let (walls, params) = reference();
        let mesh = build_corner_strip(&walls, &params);

        let arc_radius = params.bend_radius + params.offset;
        let center = walls.bend_center(params.bend_radius);

        // The left flat's last column must land on the arc's start point,
        // and the arc's last column on the right flat's first point.
        let arc_start =
            center + (walls.left_normal() * arc_radius) + Vec3::new(0.0, -params.height * 0.5, 0.0);
        let left_end = column_pos(&mesh, &params, params.left_segs);
        assert!((left_end - arc_start).length() < EPS);

        let tangent = walls.tangent_distance(params.bend_radius);
        let right_start_expected = walls.right_along() * tangent
            + walls.right_normal() * params.offset
            + Vec3::new(0.0, -params.height * 0.5, 0.0);
        let arc_end = column_pos(&mesh, &params, params.left_segs + params.arc_segs);
        assert!((arc_end - right_start_expected).length() < EPS);
    }

    #[test]
    fn regions_join_at_other_half_angles_too() {
        // The joint arithmetic is angle-independent, not a 45° accident.
        for half_angle in [0.4, std::f32::consts::FRAC_PI_4, 1.0] {
            let walls = WallConfig::new(half_angle, 5.0, 4.0);
            let params = StripParams {
                left_extent: 3.0,
                right_extent: 1.5,
                ..StripParams::default()
            };
            let mesh = build_corner_strip(&walls, &params);

            let arc_radius = params.bend_radius + params.offset;
            let center = walls.bend_center(params.bend_radius);
            let y = Vec3::new(0.0, -params.height * 0.5, 0.0);

            let left_end = column_pos(&mesh, &params, params.left_segs);
            assert!((left_end - (center + walls.left_normal() * arc_radius + y)).length() < EPS);

            let arc_end = column_pos(&mesh, &params, params.left_segs + params.arc_segs);
            assert!((arc_end - (center + walls.right_normal() * arc_radius + y)).length() < EPS);
        }
    }

    #[test]
    fn u_is_monotonic_and_spans_zero_to_one() {
        let (walls, params) = reference();
        let mesh = build_corner_strip(&walls, &params);

        let row_count = (params.height_segs + 1) as usize;
        let total_cols = (params.left_segs + params.arc_segs + params.right_segs) as usize;

        let mut last_u = -1.0;
        for col in 0..=total_cols {
            let u = mesh.vertices[col * row_count].uv[0];
            assert!(u >= last_u, "U must not decrease across columns");
            last_u = u;
        }
        assert_eq!(mesh.vertices[0].uv[0], 0.0);
        assert_eq!(mesh.vertices[total_cols * row_count].uv[0], 1.0);
    }

    #[test]
    fn v_spans_zero_to_one_per_column() {
        let (walls, params) = reference();
        let mesh = build_corner_strip(&walls, &params);
        let row_count = (params.height_segs + 1) as usize;

        assert_eq!(mesh.vertices[0].uv[1], 0.0);
        assert_eq!(mesh.vertices[row_count - 1].uv[1], 1.0);
    }

    #[test]
    fn mirrored_params_reflect_across_the_bisector() {
        let walls = WallConfig::default();
        let params = StripParams {
            left_extent: 2.0,
            right_extent: 2.0,
            left_segs: 16,
            right_segs: 16,
            ..StripParams::default()
        };
        let mesh = build_corner_strip(&walls, &params);
        let total_cols = params.left_segs + params.arc_segs + params.right_segs;

        for i in 0..=params.left_segs {
            let left = column_pos(&mesh, &params, i);
            let right = column_pos(&mesh, &params, total_cols - i);
            assert!((left.x + right.x).abs() < EPS);
            assert!((left.z - right.z).abs() < EPS);
        }
    }

    #[test]
    fn arc_columns_keep_constant_clearance() {
        // Every arc column sits at bend_radius + offset from the bend
        // center: 0.12 + 0.08 = 0.20 for the reference parameters, around
        // a center at depth -0.12·√2 ≈ -0.1697.
        let (walls, params) = reference();
        let mesh = build_corner_strip(&walls, &params);
        let center = walls.bend_center(params.bend_radius);
        assert!((center.z + 0.169_705_6).abs() < 1e-4);

        for col in params.left_segs..=(params.left_segs + params.arc_segs) {
            let p = column_pos(&mesh, &params, col);
            let radial = Vec3::new(p.x - center.x, 0.0, p.z - center.z);
            assert!((radial.length() - 0.20).abs() < EPS);
        }
    }

    #[test]
    fn empty_arc_still_meets_at_the_crease() {
        let walls = WallConfig::default();
        let params = StripParams {
            arc_segs: 0,
            ..StripParams::default()
        };
        let mesh = build_corner_strip(&walls, &params);

        // Both flats' boundary columns land on the crease line where the
        // two offset surfaces cross: (0, y, offset / cos θ).
        let crease_z = params.offset / walls.half_angle.cos();
        let left_end = column_pos(&mesh, &params, params.left_segs);
        assert!(left_end.x.abs() < EPS);
        assert!((left_end.z - crease_z).abs() < EPS);

        for v in &mesh.vertices {
            assert!(v.position.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn normals_are_unit_length() {
        let (walls, params) = reference();
        let mesh = build_corner_strip(&walls, &params);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    #[should_panic(expected = "bend radius")]
    fn zero_bend_radius_is_rejected() {
        let walls = WallConfig::default();
        let params = StripParams {
            bend_radius: 0.0,
            ..StripParams::default()
        };
        build_corner_strip(&walls, &params);
    }

    #[test]
    #[should_panic(expected = "bend tangent")]
    fn oversized_bend_is_rejected() {
        let walls = WallConfig::default();
        let params = StripParams {
            bend_radius: 1.0,
            right_extent: 0.6,
            ..StripParams::default()
        };
        build_corner_strip(&walls, &params);
    }

    #[test]
    fn cache_reuses_the_same_build() {
        let (walls, params) = reference();
        let mut cache = StripCache::new();
        let a = cache.get_or_build(&walls, &params);
        let b = cache.get_or_build(&walls, &params);
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn cache_rebuilds_on_changed_params() {
        let (walls, params) = reference();
        let mut cache = StripCache::new();
        let a = cache.get_or_build(&walls, &params);

        let coarser = StripParams {
            arc_segs: 6,
            ..params
        };
        let b = cache.get_or_build(&walls, &coarser);
        assert!(!Rc::ptr_eq(&a, &b));
        assert_ne!(a.vertices.len(), b.vertices.len());
    }
}
