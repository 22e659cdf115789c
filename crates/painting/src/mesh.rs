//! Immutable triangle mesh the engine paints on.
//!
//! Vertex positions never change after construction: drawing UVs are derived
//! from projecting these positions through the camera, and adjacency is
//! computed from exact position equality.

use glam::Vec3;

use crate::error::{PaintError, check_face_id};
use crate::geometry::ray_triangle_intersection;
use crate::types::MeshHit;

/// A triangle of the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshFace {
    /// Vertex indices, counter-clockwise when seen from the front
    pub vertices: [u32; 3],
    /// Unit face normal
    pub normal: Vec3,
}

/// Triangle mesh with per-face normals. Face ids are indices into `faces`.
#[derive(Debug, Clone)]
pub struct PaintMesh {
    positions: Vec<Vec3>,
    faces: Vec<MeshFace>,
}

impl PaintMesh {
    /// Create a mesh from positions and faces with explicit normals.
    ///
    /// Fails with [`PaintError::InvalidVertexIndex`] if a face references a
    /// vertex that does not exist.
    pub fn new(positions: Vec<Vec3>, faces: Vec<MeshFace>) -> Result<Self, PaintError> {
        let vertex_count = positions.len();
        for (face_id, face) in faces.iter().enumerate() {
            if let Some(&vertex) = face
                .vertices
                .iter()
                .find(|&&v| v as usize >= vertex_count)
            {
                return Err(PaintError::InvalidVertexIndex {
                    face_id: face_id as u32,
                    vertex,
                    vertex_count,
                });
            }
        }
        Ok(Self { positions, faces })
    }

    /// Create a mesh from a flat index list (3 per triangle), computing flat
    /// normals from the winding.
    pub fn from_triangles(positions: Vec<Vec3>, indices: &[u32]) -> Result<Self, PaintError> {
        if indices.len() % 3 != 0 {
            return Err(PaintError::InvalidIndexCount(indices.len()));
        }
        let vertex_count = positions.len();
        let mut faces = Vec::with_capacity(indices.len() / 3);
        for (face_id, tri) in indices.chunks_exact(3).enumerate() {
            let vertices = [tri[0], tri[1], tri[2]];
            if let Some(&vertex) = vertices.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(PaintError::InvalidVertexIndex {
                    face_id: face_id as u32,
                    vertex,
                    vertex_count,
                });
            }
            let [p0, p1, p2] = vertices.map(|v| positions[v as usize]);
            let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
            faces.push(MeshFace { vertices, normal });
        }
        Ok(Self { positions, faces })
    }

    /// Axis-aligned cube centered at the origin: 8 shared vertices, 12 faces.
    ///
    /// Faces come in pairs per side, in the order +Z, -Z, +X, -X, +Y, -Y.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let positions = vec![
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
        ];
        let indices: [u32; 36] = [
            0, 1, 2, 0, 2, 3, // +Z
            5, 4, 7, 5, 7, 6, // -Z
            1, 5, 6, 1, 6, 2, // +X
            4, 0, 3, 4, 3, 7, // -X
            3, 2, 6, 3, 6, 7, // +Y
            4, 5, 1, 4, 1, 0, // -Y
        ];
        let faces = indices
            .chunks_exact(3)
            .map(|tri| {
                let vertices = [tri[0], tri[1], tri[2]];
                let [p0, p1, p2] = vertices.map(|v| positions[v as usize]);
                MeshFace {
                    vertices,
                    normal: (p1 - p0).cross(p2 - p0).normalize(),
                }
            })
            .collect();
        Self { positions, faces }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// All vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// All faces, indexed by face id
    pub fn faces(&self) -> &[MeshFace] {
        &self.faces
    }

    /// Get a face by id
    pub fn face(&self, face_id: u32) -> Result<&MeshFace, PaintError> {
        let index = check_face_id(face_id, self.faces.len())?;
        Ok(&self.faces[index])
    }

    /// Positions of a face's three corners
    pub fn face_positions(&self, face_id: u32) -> Result<[Vec3; 3], PaintError> {
        let face = self.face(face_id)?;
        Ok(face.vertices.map(|v| self.positions[v as usize]))
    }

    /// Cast a ray against the mesh and return the closest hit.
    ///
    /// Brute force over all triangles. Returns `None` when the ray misses.
    pub fn raycast(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<MeshHit> {
        let mut closest: Option<MeshHit> = None;

        for (face_id, face) in self.faces.iter().enumerate() {
            let [v0, v1, v2] = face.vertices.map(|v| self.positions[v as usize]);
            let Some(hit) = ray_triangle_intersection(ray_origin, ray_dir, v0, v1, v2) else {
                continue;
            };
            if closest.is_some_and(|prev| hit.t >= prev.distance) {
                continue;
            }
            closest = Some(MeshHit {
                face_id: face_id as u32,
                position: ray_origin + ray_dir * hit.t,
                barycentric: Vec3::new(1.0 - hit.u - hit.v, hit.u, hit.v),
                distance: hit.t,
            });
        }

        closest
    }
}
