//! Error types for the painting engine.

use surfpaint_config::ConfigError;

/// Errors surfaced by engine operations.
///
/// Geometric edge cases (degenerate triangles, rays that miss the mesh) are
/// not errors: they are absorbed where they occur.
#[derive(Debug, thiserror::Error)]
pub enum PaintError {
    #[error("Invalid face id {face_id} (mesh has {face_count} faces)")]
    InvalidFaceId { face_id: u32, face_count: usize },

    #[error("Face {face_id} references vertex {vertex}, but mesh has {vertex_count} vertices")]
    InvalidVertexIndex {
        face_id: u32,
        vertex: u32,
        vertex_count: usize,
    },

    #[error("Mesh index count {0} is not a multiple of 3")]
    InvalidIndexCount(usize),

    #[error("Pixel surface unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Failed to load stamp texture: {0}")]
    Stamp(#[from] image::ImageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Check a face id against a face count.
#[inline]
pub(crate) fn check_face_id(face_id: u32, face_count: usize) -> Result<usize, PaintError> {
    let index = face_id as usize;
    if index < face_count {
        Ok(index)
    } else {
        Err(PaintError::InvalidFaceId {
            face_id,
            face_count,
        })
    }
}
