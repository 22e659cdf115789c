//! Mesh and layout builders shared by unit tests.

use glam::{Vec2, Vec3};

use crate::mesh::PaintMesh;

/// Flat grid in the XY plane, `cells` x `cells` quads of two triangles each.
///
/// Quad `(x, y)` owns faces `2 * (y * cells + x)` (lower-right triangle) and
/// `+1` (upper-left). Vertices are duplicated per quad so adjacency relies
/// on position equality.
pub(crate) fn grid(cells: u32) -> PaintMesh {
    let mut positions = Vec::new();
    let mut indices = Vec::new();
    for y in 0..cells {
        for x in 0..cells {
            let base = positions.len() as u32;
            let (fx, fy) = (x as f32, y as f32);
            positions.extend([
                Vec3::new(fx, fy, 0.0),
                Vec3::new(fx + 1.0, fy, 0.0),
                Vec3::new(fx + 1.0, fy + 1.0, 0.0),
                Vec3::new(fx, fy + 1.0, 0.0),
            ]);
            indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }
    PaintMesh::from_triangles(positions, &indices).unwrap()
}

/// Drawing layout that maps mesh XY directly to UV: `uv = xy / extent`.
pub(crate) fn planar_layout(mesh: &PaintMesh, extent: f32) -> Vec<[Vec2; 3]> {
    mesh.faces()
        .iter()
        .map(|face| {
            face.vertices.map(|v| {
                let p = mesh.positions()[v as usize];
                Vec2::new(p.x / extent, p.y / extent)
            })
        })
        .collect()
}
