//! Geometric predicates used by hit testing, flood fill and rasterization.
//!
//! Ray-triangle intersection uses the Moller-Trumbore algorithm. The 2D
//! helpers operate in pixel space and treat zero-area triangles as empty.

use glam::{Vec2, Vec3};
use tracing::trace;

use crate::constants::EPSILON;

/// Result of a ray-triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Distance along the ray to the intersection point
    pub t: f32,
    /// Barycentric coordinate u (weight for vertex 1)
    pub u: f32,
    /// Barycentric coordinate v (weight for vertex 2)
    pub v: f32,
}

/// Moller-Trumbore ray-triangle intersection algorithm.
///
/// Returns the hit distance and barycentric coordinates if the ray intersects
/// the triangle. Both windings are accepted.
///
/// # Arguments
/// * `ray_origin` - Origin point of the ray
/// * `ray_dir` - Direction of the ray (should be normalized for consistent t values)
/// * `v0`, `v1`, `v2` - Triangle vertices
pub fn ray_triangle_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleHit> {
    // Triangle edges sharing v0
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    // Determinant of [-dir, edge1, edge2]; near zero when the ray grazes the plane
    let pvec = ray_dir.cross(edge2);
    let det = edge1.dot(pvec);

    // Ray parallel to the triangle plane
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    // Ray origin relative to v0
    let tvec = ray_origin - v0;

    // First barycentric weight, outside [0, 1] misses
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    // Second weight; the pair must stay inside the triangle
    let qvec = tvec.cross(edge1);
    let v = ray_dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    // Distance along the ray; hits behind the origin are rejected
    let t = edge2.dot(qvec) * inv_det;
    if t < EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

/// Barycentric weights `(w0, w1, w2)` of `p` relative to triangle `abc`.
///
/// Returns `None` for a zero-area triangle.
pub fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<Vec3> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;

    let denom = v0.perp_dot(v1);
    if denom.abs() < EPSILON {
        trace!("barycentric: degenerate triangle {:?} {:?} {:?}", a, b, c);
        return None;
    }

    let w1 = v2.perp_dot(v1) / denom;
    let w2 = v0.perp_dot(v2) / denom;
    Some(Vec3::new(1.0 - w1 - w2, w1, w2))
}

/// Whether `p` lies inside (or on the boundary of) triangle `abc`.
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    match barycentric(p, a, b, c) {
        Some(w) => w.x >= 0.0 && w.y >= 0.0 && w.z >= 0.0,
        None => false,
    }
}

/// Shortest distance from `p` to the segment `ab`.
///
/// A zero-length segment degrades to the distance to its endpoint.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < EPSILON * EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Whether a circle overlaps triangle `tri`.
///
/// True when the center lies inside the triangle or any edge passes within
/// `radius` of the center (which also covers triangles wholly inside the
/// circle). A radius of zero or less never intersects.
pub fn circle_intersects_triangle(center: Vec2, radius: f32, tri: [Vec2; 3]) -> bool {
    if radius <= 0.0 {
        return false;
    }

    let [a, b, c] = tri;
    if point_in_triangle(center, a, b, c) {
        return true;
    }

    [(a, b), (b, c), (c, a)]
        .iter()
        .any(|&(start, end)| point_segment_distance(center, start, end) <= radius)
}
