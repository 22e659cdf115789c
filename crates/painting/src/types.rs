use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Which texture layout is currently applied to the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextureMode {
    /// Per-face patches; what the mesh shows between strokes
    #[default]
    Viewing,
    /// Screen-aligned layout the brush paints into
    Drawing,
}

/// Circular stroke footprint in drawing-surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactCircle {
    /// Center in pixels, top-left origin
    pub center: Vec2,
    /// Radius in pixels
    pub radius: f32,
}

impl ImpactCircle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Result of a ray-mesh intersection.
#[derive(Debug, Clone, Copy)]
pub struct MeshHit {
    /// Face (triangle) that was hit
    pub face_id: u32,
    /// Hit position in mesh space
    pub position: Vec3,
    /// Barycentric coordinates (w, u, v) of the hit inside the face
    pub barycentric: Vec3,
    /// Distance along the ray
    pub distance: f32,
}

/// What happened when a pointer event reached the stroke coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// The pointer ray missed the mesh; no stroke was started
    Missed,
    /// A stroke began on `face_id`
    Started { face_id: u32, faces_added: usize },
    /// The active stroke continued; `faces_added` new faces were marked
    Continued { faces_added: usize },
    /// The event arrived while no stroke was active
    Ignored,
}

/// Counters describing how much work the texture store has done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineStats {
    /// Times the drawing layout was projected and rendered
    pub projection_passes: u64,
    /// Times a patch was extracted from the drawing surface
    pub reconciliations: u64,
    /// Faces whose viewing layout was rewritten, summed over all reconciliations
    pub faces_reconciled: u64,
}
