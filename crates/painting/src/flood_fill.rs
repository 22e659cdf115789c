//! Connectivity-bounded flood fill over the face adjacency graph.
//!
//! Starting at a seed face, the fill walks neighbors whose on-screen
//! triangle (drawing UVs scaled to pixels) overlaps the stroke's impact
//! circle. A face that misses the circle is not expanded through, so paint
//! never jumps a gap even when a farther face also overlaps the circle.
//!
//! The visited bitmap is scoped to one stroke: faces marked on an earlier
//! pointer sample are not retested on later samples.

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::adjacency::FaceAdjacencyGraph;
use crate::error::{PaintError, check_face_id};
use crate::face_set::AffectedFaceSet;
use crate::geometry::circle_intersects_triangle;
use crate::mesh::PaintMesh;
use crate::projection::uv_to_pixel;
use crate::types::ImpactCircle;

/// Inputs the fill reads for one pointer sample.
#[derive(Clone, Copy)]
pub struct FillContext<'a> {
    pub mesh: &'a PaintMesh,
    pub graph: &'a FaceAdjacencyGraph,
    /// Drawing UVs per face, projected for the current camera
    pub drawing_uvs: &'a [[Vec2; 3]],
    /// Drawing surface size in pixels
    pub surface_size: (u32, u32),
    /// Normalized camera position, used as the front-facing direction
    pub view_direction: Vec3,
}

/// Stroke-scoped flood fill state. Storage is reused across strokes.
#[derive(Debug, Clone, Default)]
pub struct SurfaceFloodFill {
    visited: Vec<bool>,
    stack: Vec<u32>,
}

impl SurfaceFloodFill {
    /// Create fill state for a mesh with `face_count` faces.
    pub fn new(face_count: usize) -> Self {
        Self {
            visited: vec![false; face_count],
            stack: Vec::new(),
        }
    }

    /// Forget all faces visited by the previous stroke.
    pub fn reset(&mut self) {
        self.visited.fill(false);
        self.stack.clear();
    }

    /// Whether `face_id` was marked during the current stroke.
    pub fn is_visited(&self, face_id: u32) -> Result<bool, PaintError> {
        let index = check_face_id(face_id, self.visited.len())?;
        Ok(self.visited[index])
    }

    /// Expand from `seed`, adding every reachable face that overlaps `circle`
    /// to `affected`.
    ///
    /// Returns the number of faces newly added. A visited seed is a no-op.
    /// Neighbors are only entered when their normal faces the camera.
    pub fn fill(
        &mut self,
        seed: u32,
        circle: ImpactCircle,
        ctx: &FillContext<'_>,
        affected: &mut AffectedFaceSet,
    ) -> Result<usize, PaintError> {
        let seed_index = check_face_id(seed, self.visited.len())?;
        if ctx.drawing_uvs.len() != self.visited.len() {
            return Err(PaintError::ResourceUnavailable(format!(
                "drawing layout has {} faces, expected {}",
                ctx.drawing_uvs.len(),
                self.visited.len()
            )));
        }
        if self.visited[seed_index] {
            return Ok(0);
        }

        let faces = ctx.mesh.faces();
        let mut added = 0;

        self.stack.clear();
        self.stack.push(seed);

        while let Some(face_id) = self.stack.pop() {
            let index = face_id as usize;
            if self.visited[index] {
                continue;
            }

            let triangle = ctx.drawing_uvs[index].map(|uv| uv_to_pixel(uv, ctx.surface_size));
            if !circle_intersects_triangle(circle.center, circle.radius, triangle) {
                continue;
            }

            self.visited[index] = true;
            if affected.add(face_id)? {
                added += 1;
            }

            // Reverse so the first neighbor is expanded first, as recursion would
            for &neighbor in ctx.graph.neighbors_of(face_id)?.iter().rev() {
                let n = neighbor as usize;
                if !self.visited[n] && faces[n].normal.dot(ctx.view_direction) > 0.0 {
                    self.stack.push(neighbor);
                }
            }
        }

        debug!(
            "SurfaceFloodFill: seed={} center=({:.1}, {:.1}) radius={:.1} -> {} new faces",
            seed, circle.center.x, circle.center.y, circle.radius, added
        );

        Ok(added)
    }
}
