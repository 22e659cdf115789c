//! Face adjacency graph, built once per mesh.
//!
//! Two faces are neighbors when exactly two of one face's corners coincide
//! (by exact position) with corners of the other AND their normals are not
//! opposed. The opposed-normal rule keeps paint from crossing seams where the
//! winding flips.
//!
//! The default [`AdjacencyStrategy::Pairwise`] build compares every pair of
//! faces and is O(F^2). [`AdjacencyStrategy::EdgeIndexed`] only compares
//! faces that share an edge key; it applies the same acceptance rule, so it
//! differs only for faces that repeat a corner position.

use std::collections::HashMap;

use glam::Vec3;
use surfpaint_config::AdjacencyStrategy;
use tracing::info;

use crate::error::{PaintError, check_face_id};
use crate::mesh::PaintMesh;

/// Symmetric face-to-face neighbor lists, fixed after construction.
#[derive(Debug, Clone, Default)]
pub struct FaceAdjacencyGraph {
    neighbors: Vec<Vec<u32>>,
}

impl FaceAdjacencyGraph {
    /// Build with the pairwise strategy.
    pub fn build(mesh: &PaintMesh) -> Self {
        Self::build_with(mesh, AdjacencyStrategy::Pairwise)
    }

    /// Build with an explicit strategy.
    pub fn build_with(mesh: &PaintMesh, strategy: AdjacencyStrategy) -> Self {
        let graph = match strategy {
            AdjacencyStrategy::Pairwise => Self::build_pairwise(mesh),
            AdjacencyStrategy::EdgeIndexed => Self::build_edge_indexed(mesh),
        };
        info!(
            "FaceAdjacencyGraph: {} faces, {} edges ({:?})",
            graph.face_count(),
            graph.edge_count(),
            strategy
        );
        graph
    }

    fn build_pairwise(mesh: &PaintMesh) -> Self {
        let face_count = mesh.face_count();
        let mut neighbors = vec![Vec::new(); face_count];

        for i in 0..face_count {
            for j in (i + 1)..face_count {
                if are_neighbors(mesh, i, j) {
                    neighbors[i].push(j as u32);
                    neighbors[j].push(i as u32);
                }
            }
        }

        Self { neighbors }
    }

    fn build_edge_indexed(mesh: &PaintMesh) -> Self {
        let face_count = mesh.face_count();
        let mut edge_faces: HashMap<(PositionKey, PositionKey), Vec<usize>> = HashMap::new();

        for (face_index, face) in mesh.faces().iter().enumerate() {
            let keys = face
                .vertices
                .map(|v| PositionKey::new(mesh.positions()[v as usize]));
            for (a, b) in [(keys[0], keys[1]), (keys[1], keys[2]), (keys[2], keys[0])] {
                let edge = if a <= b { (a, b) } else { (b, a) };
                edge_faces.entry(edge).or_default().push(face_index);
            }
        }

        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); face_count];
        for faces in edge_faces.values() {
            for (n, &i) in faces.iter().enumerate() {
                for &j in &faces[n + 1..] {
                    if i != j && are_neighbors(mesh, i, j) {
                        neighbors[i].push(j as u32);
                        neighbors[j].push(i as u32);
                    }
                }
            }
        }

        // Match pairwise ordering; faces sharing two edge keys appear twice
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        Self { neighbors }
    }

    /// Neighbor face ids of `face_id`, in ascending order.
    pub fn neighbors_of(&self, face_id: u32) -> Result<&[u32], PaintError> {
        let index = check_face_id(face_id, self.neighbors.len())?;
        Ok(&self.neighbors[index])
    }

    /// Number of faces (graph nodes)
    pub fn face_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of undirected neighbor relations
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }
}

/// The adjacency acceptance rule shared by both strategies.
fn are_neighbors(mesh: &PaintMesh, i: usize, j: usize) -> bool {
    let faces = mesh.faces();
    let (face_i, face_j) = (&faces[i], &faces[j]);

    if face_i.normal.dot(face_j.normal) <= 0.0 {
        return false;
    }

    let positions = mesh.positions();
    let corners_j = face_j.vertices.map(|v| positions[v as usize]);
    let shared = face_i
        .vertices
        .iter()
        .filter(|&&v| corners_j.contains(&positions[v as usize]))
        .count();

    shared == 2
}

/// Hashable exact position. `-0.0` and `0.0` map to the same key, matching `==`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct PositionKey([u32; 3]);

impl PositionKey {
    fn new(p: Vec3) -> Self {
        let bits = |c: f32| (c + 0.0).to_bits();
        Self([bits(p.x), bits(p.y), bits(p.z)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshFace;
    use crate::test_support::grid;

    fn assert_symmetric(graph: &FaceAdjacencyGraph) {
        for i in 0..graph.face_count() as u32 {
            for &j in graph.neighbors_of(i).unwrap() {
                assert!(
                    graph.neighbors_of(j).unwrap().contains(&i),
                    "{j} lists no edge back to {i}"
                );
            }
        }
    }

    #[test]
    fn test_cube_pairs_coplanar_triangles() {
        let graph = FaceAdjacencyGraph::build(&PaintMesh::cube(1.0));

        // Perpendicular sides have dot product 0, so only the two triangles
        // of each side are neighbors
        for side in 0..6u32 {
            assert_eq!(graph.neighbors_of(side * 2).unwrap(), &[side * 2 + 1]);
            assert_eq!(graph.neighbors_of(side * 2 + 1).unwrap(), &[side * 2]);
        }
        assert_eq!(graph.edge_count(), 6);
        assert_symmetric(&graph);
    }

    #[test]
    fn test_grid_adjacency() {
        let graph = FaceAdjacencyGraph::build(&grid(3));
        assert_symmetric(&graph);

        // Center quad's lower triangle (face 8) borders its partner (9),
        // the quad below (face 3 via the bottom edge) and the quad to the right (11)
        assert_eq!(graph.neighbors_of(8).unwrap(), &[3, 9, 11]);
        // Corner triangle has one neighbor in its quad plus one outside
        assert_eq!(graph.neighbors_of(0).unwrap(), &[1, 3]);
    }

    #[test]
    fn test_opposed_normals_not_adjacent() {
        // Same triangle edge, second face wound the other way
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        let faces = vec![
            MeshFace {
                vertices: [0, 1, 2],
                normal: Vec3::Z,
            },
            MeshFace {
                vertices: [1, 2, 3],
                normal: Vec3::NEG_Z,
            },
        ];
        let mesh = PaintMesh::new(positions, faces).unwrap();
        let graph = FaceAdjacencyGraph::build(&mesh);
        assert!(graph.neighbors_of(0).unwrap().is_empty());
        assert!(graph.neighbors_of(1).unwrap().is_empty());
    }

    #[test]
    fn test_single_shared_vertex_not_adjacent() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
        ];
        let mesh = PaintMesh::from_triangles(positions, &[0, 1, 2, 0, 3, 4]).unwrap();
        let graph = FaceAdjacencyGraph::build(&mesh);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_edge_indexed_matches_pairwise() {
        for mesh in [PaintMesh::cube(1.0), grid(4)] {
            let pairwise = FaceAdjacencyGraph::build_with(&mesh, AdjacencyStrategy::Pairwise);
            let indexed = FaceAdjacencyGraph::build_with(&mesh, AdjacencyStrategy::EdgeIndexed);
            for face_id in 0..mesh.face_count() as u32 {
                assert_eq!(
                    pairwise.neighbors_of(face_id).unwrap(),
                    indexed.neighbors_of(face_id).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_neighbors_of_invalid_id() {
        let graph = FaceAdjacencyGraph::build(&PaintMesh::cube(1.0));
        assert!(matches!(
            graph.neighbors_of(99),
            Err(PaintError::InvalidFaceId { face_id: 99, .. })
        ));
    }
}
