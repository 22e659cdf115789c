//! Reusable set of face ids touched by a stroke.

use crate::error::{PaintError, check_face_id};

/// Insertion-ordered set of face ids over a fixed universe `0..face_count`.
///
/// Membership is a flag per face; order is kept in a separate list so
/// iteration is deterministic. `reset` clears only the flags of current
/// members and keeps both allocations for the next stroke.
#[derive(Debug, Clone, Default)]
pub struct AffectedFaceSet {
    present: Vec<bool>,
    order: Vec<u32>,
}

impl AffectedFaceSet {
    /// Create an empty set for a mesh with `face_count` faces.
    pub fn new(face_count: usize) -> Self {
        Self {
            present: vec![false; face_count],
            order: Vec::new(),
        }
    }

    /// Mark `face_id` present. Returns `true` if it was newly added.
    pub fn add(&mut self, face_id: u32) -> Result<bool, PaintError> {
        let index = check_face_id(face_id, self.present.len())?;
        if self.present[index] {
            return Ok(false);
        }
        self.present[index] = true;
        self.order.push(face_id);
        Ok(true)
    }

    /// Membership test.
    pub fn contains(&self, face_id: u32) -> Result<bool, PaintError> {
        let index = check_face_id(face_id, self.present.len())?;
        Ok(self.present[index])
    }

    /// Visit members in insertion order.
    pub fn for_each(&self, mut visitor: impl FnMut(u32)) {
        for &face_id in &self.order {
            visitor(face_id);
        }
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.order.iter().copied()
    }

    /// Members in insertion order, as a slice.
    pub fn as_slice(&self) -> &[u32] {
        &self.order
    }

    /// Remove all members without releasing storage.
    pub fn reset(&mut self) {
        for &face_id in &self.order {
            self.present[face_id as usize] = false;
        }
        self.order.clear();
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Size of the id universe
    pub fn capacity(&self) -> usize {
        self.present.len()
    }
}
